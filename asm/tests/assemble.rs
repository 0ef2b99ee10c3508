use c8asm::{assemble, assemble_program, Category, Error, Reason};

fn words(code: &str) -> Vec<u16> {
    let lines: Vec<&str> = code.lines().collect();
    match assemble_program(&lines) {
        Ok(assembly) => assembly.words,
        Err(err) => panic!("{}:{}: {}\n{}", err.line, err.col, err, code),
    }
}

fn error(code: &str) -> Error {
    let lines: Vec<&str> = code.lines().collect();
    match assemble(&lines) {
        Ok(bytes) => panic!("expected an error, got {:02X?}\n{}", bytes, code),
        Err(err) => err,
    }
}

macro_rules! case {
    ($name:ident, $code:expr, $word:expr) => {
        #[test]
        fn $name() {
            assert_eq!(words($code), vec![$word], "{}", $code);
        }
    };
}

case!(cls, "cls", 0x00E0);
case!(ret, "RET", 0x00EE);
case!(jp, "jp 0x2a0", 0x12A0);
case!(jp_v0, "jp v0, 0x300", 0xB300);
case!(call, "call 0x222", 0x2222);
case!(se_byte, "se v1, 0x12", 0x3112);
case!(sne_byte, "sne v1, 18", 0x4112);
case!(se_reg, "se v1, v2", 0x5120);
case!(sne_reg, "sne v1, v2", 0x9120);
case!(ld_byte, "ld v0, 255", 0x60FF);
case!(ld_binary, "ld v0, 0b1010", 0x600A);
case!(add_byte, "add va, 0o17", 0x7A0F);
case!(ld_reg, "ld v3, v4", 0x8340);
case!(or, "or v3, v4", 0x8341);
case!(and, "and v3, v4", 0x8342);
case!(xor, "xor v3, v4", 0x8343);
case!(add_reg, "add v3, v4", 0x8344);
case!(sub, "sub v3, v4", 0x8345);
case!(shr, "shr v3", 0x8306);
case!(shr_y, "shr v3, v4", 0x8346);
case!(subn, "subn v3, v4", 0x8347);
case!(shl, "shl v3", 0x830E);
case!(ld_i, "ld i, 0x2ea", 0xA2EA);
case!(rnd, "rnd v2, 0x0f", 0xC20F);
case!(drw, "drw v0, v1, 5", 0xD015);
case!(skp, "skp v9", 0xE99E);
case!(sknp, "sknp v9", 0xE9A1);
case!(ld_vx_dt, "ld v6, dt", 0xF607);
case!(ld_vx_k, "ld v6, k", 0xF60A);
case!(ld_dt, "ld dt, v6", 0xF615);
case!(ld_st, "ld st, v6", 0xF618);
case!(add_i, "add i, v6", 0xF61E);
case!(ld_f, "ld f, v6", 0xF629);
case!(ld_b, "ld b, v6", 0xF633);
case!(store, "ld [i], v3", 0xF355);
case!(load, "ld v3, [i]", 0xF365);
case!(dw, "dw 0xBEEF", 0xBEEF);
case!(comment_after, "cls ; clear screen", 0x00E0);

#[test]
fn test_bytes_are_big_endian() {
    assert_eq!(assemble(&["ld v0, 0x12", "jp 0x200"]), Ok(vec![0x60, 0x12, 0x12, 0x00]));
}

#[test]
fn test_forward_reference() {
    let code = "\
        jp [end]\n\
        cls\n\
        end: ret";
    assert_eq!(words(code), vec![0x1204, 0x00E0, 0x00EE]);
}

#[test]
fn test_self_loop() {
    assert_eq!(words("loop: jp [loop]"), vec![0x1200]);
}

#[test]
fn test_label_on_own_line() {
    let code = "\
        ; sprite data follows code\n\
        ld i, [sprite]\n\
        drw v0, v1, 2\n\
        sprite:\n\
        dw 0xFF81";
    assert_eq!(words(code), vec![0xA204, 0xD012, 0xFF81]);
}

#[test]
fn test_constants() {
    let code = "\
        const speed 4\n\
        const wide 0x1FF\n\
        add v1, $speed\n\
        ld i, $wide\n\
        dw $wide";
    assert_eq!(words(code), vec![0x7104, 0xA1FF, 0x01FF]);
}

#[test]
fn test_constant_out_of_range() {
    let err = error("const wide 0x1FF\nld v0, $wide");
    assert_eq!(err.category(), Category::Range);
    assert_eq!((err.line, err.col), (2, 8));
}

#[test]
fn test_label_redefinition() {
    let err = error("a: cls\nb: cls\na: cls");
    assert_eq!(err.category(), Category::Symbol);
    assert_eq!(
        err.reason,
        Reason::RedefinedLabel {
            name: "a".into(),
            first: 1
        }
    );
    assert_eq!((err.line, err.col), (3, 1));
}

#[test]
fn test_constant_redefinition() {
    let err = error("const x 1\nconst x 2");
    assert_eq!(err.category(), Category::Symbol);
}

#[test]
fn test_undefined_label() {
    let err = error("cls\ncall [missing]");
    assert_eq!(err.reason, Reason::UndefinedLabel("missing".into()));
    assert_eq!((err.line, err.col), (2, 6));
}

#[test]
fn test_undefined_constant() {
    let err = error("ld v0, $nope");
    assert_eq!(err.reason, Reason::UndefinedConstant("nope".into()));
}

#[test]
fn test_range() {
    assert_eq!(words("ld v0, 255"), vec![0x60FF]);
    let err = error("ld v0, 256");
    assert_eq!(err.category(), Category::Range);
    assert_eq!(err.reason, Reason::Overflow { value: 256, max: 0xFF });
    assert_eq!((err.line, err.col), (1, 8));

    assert_eq!(error("drw v0, v1, 16").category(), Category::Range);
    assert_eq!(error("jp 0x1000").category(), Category::Range);
    assert_eq!(error("dw 0x10000").category(), Category::Range);

    let err = error("ld v0, 4294967296");
    assert_eq!(err.category(), Category::Range);
    assert_eq!(
        err.reason,
        Reason::TooWide {
            text: "4294967296".into(),
            max: 0xFF
        }
    );
    assert_eq!((err.line, err.col), (1, 8));
}

#[test]
fn test_syntax_errors() {
    macro_rules! syntax {
        ($code:expr, $reason:expr) => {
            let err = error($code);
            assert_eq!(err.category(), Category::Syntax, "{}", $code);
            assert_eq!(err.reason, $reason, "{}", $code);
        };
    }

    syntax!("nop", Reason::UnknownCommand("nop".into()));
    syntax!("v0 cls", Reason::UnknownCommand("v0".into()));
    syntax!("ld v0", Reason::MissingOperand("operand"));
    syntax!("add v0", Reason::MissingOperand("value"));
    syntax!("cls v0", Reason::Trailing("v0".into()));
    syntax!("jp v1, 0x200", Reason::OnlyV0("v1".into()));
    syntax!("ld [x], v0", Reason::OnlyIndex("x".into()));
    syntax!("ld v0, [j]", Reason::OnlyIndex("j".into()));
    syntax!("ld v0, st", Reason::InvalidCombination("v0".into(), "st".into()));
    syntax!("ld vz, 1", Reason::UnknownRegister("vz".into()));
    syntax!("ld v0, 12ab", Reason::ParseValue("12ab".into()));
    syntax!(
        "jp loop",
        Reason::Unexpected {
            expected: "address",
            found: "loop".into()
        }
    );
    syntax!(
        "or v0, 1",
        Reason::Unexpected {
            expected: "register",
            found: "1".into()
        }
    );
    syntax!(
        "ld k, v0",
        Reason::Unexpected {
            expected: "register",
            found: "k".into()
        }
    );
}

#[test]
fn test_first_error_wins() {
    let err = error("nop\nld v0, 256\ncall [missing]");
    assert_eq!(err.line, 1);
}

#[test]
fn test_program_too_large() {
    let lines = vec!["cls"; 1793];
    let err = assemble(&lines).unwrap_err();
    assert_eq!(err.reason, Reason::ProgramTooLarge(3586));
    assert_eq!(err.category(), Category::Range);

    let lines = vec!["cls"; 1792];
    assert_eq!(assemble(&lines).map(|bytes| bytes.len()), Ok(3584));
}
