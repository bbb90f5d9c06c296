use retroasm::msg::Level;
use retroasm::{assemble, Assembler, Error, Symbol};

fn hex(code: &str) -> Vec<u8> {
    assemble(code, 0xC000).unwrap()
}

macro_rules! fixture {
    ($name:ident, $code:expr, [$($byte:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            assert_eq!(hex($code), vec![$($byte),*]);
        }
    };
}

const BORDER: &str = "\
    LDX #$00
loop:
    STX $D020   ; border colour
    INX
    CPX #$10
    BNE loop
    LDX #$00
    JMP loop
    RTS
";

fixture!(
    border_loop,
    BORDER,
    [0xA2, 0x00, 0x8E, 0x20, 0xD0, 0xE8, 0xE0, 0x10, 0xD0, 0xF8, 0xA2, 0x00, 0x4C, 0x02, 0xC0, 0x60]
);

// ---- Directives ----
fixture!(byte, ".byte $DE $AD $BE $EF", [0xDE, 0xAD, 0xBE, 0xEF]);
fixture!(word_big_endian, ".word $DEAD $BEEF", [0xDE, 0xAD, 0xBE, 0xEF]);
fixture!(string, ".string \"AB\"", [0x41, 0x42, 0x00]);
fixture!(byte_then_code, ".byte $01 $02\nRTS", [0x01, 0x02, 0x60]);

// ---- Addressing modes ----
fixture!(implied, "CLC\nSEI\nRTS", [0x18, 0x78, 0x60]);
fixture!(accumulator, "ASL A\nLSR A", [0x0A, 0x4A]);
fixture!(zero_page, "LDA $FB", [0xA5, 0xFB]);
fixture!(zero_page_y, "LDX $FB,Y", [0xB6, 0xFB]);
fixture!(absolute_x, "STA $0400,X", [0x9D, 0x00, 0x04]);
fixture!(indirect, "JMP ($FFFC)", [0x6C, 0xFC, 0xFF]);
fixture!(indirect_y, "LDA ($FB),Y", [0xB1, 0xFB]);
fixture!(indirect_x, "LDA ($FB,X)", [0xA1, 0xFB]);

// ---- Symbols ----
fixture!(variable_immediate, "black = #$00\nLDA black", [0xA9, 0x00]);
fixture!(variable_zero_page, "ptr = $FB\nLDA ptr", [0xA5, 0xFB]);
fixture!(variable_address, "border = $D020\nSTA border", [0x8D, 0x20, 0xD0]);
fixture!(
    forward_label,
    "JMP end\nNOP\nend: RTS",
    [0x4C, 0x04, 0xC0, 0xEA, 0x60]
);
fixture!(
    forward_branch,
    "BEQ skip\nINX\nskip: RTS",
    [0xF0, 0x01, 0xE8, 0x60]
);
fixture!(label_named_like_mnemonic, "JMP inc\ninc: RTS", [0x4C, 0x03, 0xC0, 0x60]);
fixture!(variable_named_like_mnemonic, "and = #$01\nLDA and", [0xA9, 0x01]);
fixture!(branch_literal_target, "BNE $C000", [0xD0, 0xFE]);
fixture!(branch_literal_offset, "BNE $05", [0xD0, 0x05]);
fixture!(
    high_low_byte,
    ".org $C020\nmsg: .string \"AB\"\nLDA <msg\nLDX >msg",
    [0x41, 0x42, 0x00, 0xA9, 0x20, 0xA2, 0xC0]
);
fixture!(
    high_low_byte_forward,
    ".org $C020\nLDA <msg\nLDX >msg\nRTS\nmsg: .string \"AB\"",
    [0xA9, 0x25, 0xA2, 0xC0, 0x60, 0x41, 0x42, 0x00]
);

#[test]
fn forward_same_as_backward() {
    let forward = hex("JMP target\n.byte $00 $00\ntarget: RTS");
    let literal = hex("JMP $C005\n.byte $00 $00\nRTS");
    assert_eq!(forward, literal);
}

#[test]
fn org_moves_counter() {
    let bytes = hex(".org $1000\nstart: NOP\nJMP start");
    assert_eq!(bytes, vec![0xEA, 0x4C, 0x00, 0x10]);
}

#[test]
fn org_after_code() {
    // Backward and forward references across the jump
    let bytes = hex("start: NOP\nJMP far\n.org $C100\nfar: JMP start\nBNE far");
    assert_eq!(
        bytes,
        vec![0xEA, 0x4C, 0x00, 0xC1, 0x4C, 0x00, 0xC0, 0xD0, 0xFB]
    );
}

#[test]
fn org_after_code_listing() {
    let output = Assembler::new()
        .run_source("main.asm", "NOP\nJMP far\n.org $C100\nfar: RTS", 0xC000)
        .unwrap();
    let addresses: Vec<_> = output.listing.iter().map(|row| row.address).collect();
    assert_eq!(addresses, vec![0xC000, 0xC001, 0xC100]);
    assert_eq!(output.symbols.get("far"), Some(&Symbol::Label(0xC100)));
}

#[test]
fn origin_and_image() {
    let output = Assembler::new()
        .run_source("main.asm", ".org $0801\nRTS", 0xC000)
        .unwrap();
    assert_eq!(output.origin, 0x0801);
    assert_eq!(output.image(), vec![0x01, 0x08, 0x60]);
}

#[test]
fn origin_defaults_to_base() {
    let output = Assembler::new()
        .run_source("main.asm", "RTS", 0x2000)
        .unwrap();
    assert_eq!(output.origin, 0x2000);
    assert_eq!(output.image(), vec![0x00, 0x20, 0x60]);
}

// ---- Errors ----

#[test]
fn duplicate_label() {
    let err = assemble("loop: NOP\nloop: RTS", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::DuplicateSymbol(name) if name == "loop"));
    assert_eq!(err.pos().map(|pos| pos.line), Some(1));
}

#[test]
fn duplicate_points_at_first() {
    let mut asm = Assembler::new();
    asm.run("NOP\nloop: NOP\nloop: RTS", 0xC000).unwrap_err();
    let notes: Vec<_> = asm.log().filter(Level::Error).collect();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].text.contains("`loop`"));
    assert_eq!(notes[0].pos.as_ref().map(|pos| pos.line), Some(1));
}

#[test]
fn duplicate_variable() {
    let err = assemble("a1 = $01\na1 = $02", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::DuplicateSymbol(_)));
}

#[test]
fn unresolved() {
    let err = assemble("JMP nowhere", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::UnresolvedReference(name) if name == "nowhere"));
}

#[test]
fn invalid_mode() {
    let err = assemble("JMP #$10", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidAddressingMode(mnemonic, _) if mnemonic == "JMP"));
}

#[test]
fn branch_out_of_range() {
    let filler = vec!["$00"; 128].join(" ");
    let code = format!("loop: NOP\n.byte {}\nBNE loop", filler);
    let err = assemble(&code, 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::RelativeOffsetOutOfRange(-131)));
}

#[test]
fn missing_operand() {
    let err = assemble("LDA", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::MissingOperand(_)));
    let err = assemble("LDA\nRTS", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::MissingOperand(mnemonic) if mnemonic == "LDA"));
}

#[test]
fn string_needs_quotes() {
    let err = assemble(".string $41", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidString(_)));
}

#[test]
fn byte_extract_of_non_word() {
    let err = assemble("ptr = $FB\nLDA <ptr", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::InvalidByteExtract(_)));
}

#[test]
fn forward_variable_drifts() {
    // Assumed absolute in prescan, immediate once resolved
    let err = assemble("LDA value\nnext: RTS\nvalue = #$10", 0xC000).unwrap_err();
    assert!(matches!(
        err.root(),
        Error::AddressDrift {
            expected: 0xC003,
            found: 0xC002
        }
    ));
}

#[test]
fn label_drifts() {
    // Only a label follows the statement that shrinks
    let err = assemble("JMP end\nLDA value\nend:\nvalue = #$10", 0xC000).unwrap_err();
    assert!(matches!(
        err.root(),
        Error::AddressDrift {
            expected: 0xC006,
            found: 0xC005
        }
    ));
}

#[test]
fn end_drifts() {
    let err = assemble("LDA value\nvalue = #$10", 0xC000).unwrap_err();
    assert!(matches!(
        err.root(),
        Error::AddressDrift {
            expected: 0xC003,
            found: 0xC002
        }
    ));
}

#[test]
fn ends_at_ffff() {
    let vectors = hex(".org $FFFA\n.byte $00 $C0 $00 $C0 $00 $C0");
    assert_eq!(vectors, vec![0x00, 0xC0, 0x00, 0xC0, 0x00, 0xC0]);
    assert_eq!(hex(".org $FFFF\nNOP"), vec![0xEA]);
    assert_eq!(hex(".org $FFFE\n.word $1234"), vec![0x12, 0x34]);
}

#[test]
fn address_overflow() {
    let err = assemble(".org $FFFF\nJMP $0000", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::AddressOverflow));
    let err = assemble(".org $FFFF\nNOP\nNOP", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::AddressOverflow));
    assert_eq!(err.pos().map(|pos| pos.line), Some(2));
    let err = assemble(".org $FFFF\nNOP\nend:", 0xC000).unwrap_err();
    assert!(matches!(err.root(), Error::AddressOverflow));
}

// ---- Run state ----

#[test]
fn runs_are_independent() {
    let mut asm = Assembler::new();
    let first = asm.run("loop: DEX\nBNE loop", 0xC000).unwrap();
    let second = asm.run("loop: DEX\nBNE loop", 0xC000).unwrap();
    assert_eq!(first, second);
}

#[test]
fn symbols_table() {
    let output = Assembler::new()
        .run_source("main.asm", BORDER, 0xC000)
        .unwrap();
    assert_eq!(output.symbols.get("loop"), Some(&Symbol::Label(0xC002)));
    let yaml = output.symbols.to_yaml().unwrap();
    assert!(yaml.contains("loop"));
    assert!(yaml.contains("$C002"));
}

#[test]
fn listing_rows() {
    let output = Assembler::new()
        .run_source("main.asm", BORDER, 0xC000)
        .unwrap();
    let rows: Vec<_> = output.listing.iter().collect();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[1].address, 0xC002);
    assert_eq!(rows[1].text, "STX $D020");
    assert_eq!(rows[4].text, "BNE $F8");
    assert_eq!(rows[4].reference.as_deref(), Some("loop"));
    assert_eq!(rows[6].bytes, vec![0x4C, 0x02, 0xC0]);
}

#[test]
fn forward_reference_logged() {
    let output = Assembler::new()
        .run_source("main.asm", "JMP end\nend: RTS", 0xC000)
        .unwrap();
    assert!(output
        .log
        .filter(Level::Diag)
        .any(|msg| msg.text.contains("forward reference `end`")));
    assert!(output
        .log
        .filter(Level::Diag)
        .any(|msg| msg.text.contains("JMP $C003 as") && msg.text.contains("Jump to New Location")));
    assert_eq!(output.log.filter(Level::Warn).count(), 0);
}

#[test]
fn stray_token_warns() {
    let output = Assembler::new()
        .run_source("main.asm", "oops\nRTS", 0xC000)
        .unwrap();
    assert_eq!(output.bytes, vec![0x60]);
    assert_eq!(output.log.filter(Level::Warn).count(), 1);
}
