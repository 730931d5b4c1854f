use greeting_record::{GreetingRecord, InvocationPayload, RecordCodec, RecordError};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_instruction,
};

/// Instruction adding `payload.counter` to the record at `greeted`.
pub fn create_greet_instruction(
    program_id: &Pubkey,
    greeted: &Pubkey,
    payload: &InvocationPayload,
) -> Result<Instruction, RecordError> {
    Ok(Instruction::new_with_bytes(
        *program_id,
        &payload.encode()?,
        vec![AccountMeta::new(*greeted, false)],
    ))
}

/// Allocates a rent exempt greeting account at the address derived from
/// `base` and `seed`. `base` has to sign.
pub fn create_greeting_account_instruction(
    payer: &Pubkey,
    base: &Pubkey,
    seed: &str,
    greeted: &Pubkey,
    lamports: u64,
    program_id: &Pubkey,
) -> Instruction {
    system_instruction::create_account_with_seed(
        payer,
        greeted,
        base,
        seed,
        lamports,
        GreetingRecord::LEN as u64,
        program_id,
    )
}
