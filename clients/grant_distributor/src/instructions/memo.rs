use crate::constants::MEMO_PROGRAM_ID;
use anchor_lang::solana_program::instruction::Instruction;

/// Memo instruction with no accounts attached; the payload is the text's UTF-8 bytes verbatim.
pub fn memo(text: &str) -> Instruction {
    Instruction {
        program_id: MEMO_PROGRAM_ID,
        accounts: vec![],
        data: text.as_bytes().to_vec(),
    }
}

pub fn decode_memo(data: &[u8]) -> Result<String, std::str::Utf8Error> {
    std::str::from_utf8(data).map(str::to_owned)
}
