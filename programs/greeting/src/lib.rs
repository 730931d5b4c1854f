use greeting_record::{GreetingRecord, InvocationPayload, RecordCodec};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

/// Accounts:
/// 0. `[writable]` greeting account, owned by this program
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let accounts_iter = &mut accounts.iter();
    let account = next_account_info(accounts_iter)?;

    let payload = InvocationPayload::decode(instruction_data).map_err(|e| {
        msg!("Invalid instruction data: {}", e);
        ProgramError::InvalidInstructionData
    })?;
    msg!("Greeting payload: {:?}", payload);

    if account.owner != program_id {
        msg!("Greeting account {} has wrong owner", account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    if !account.is_writable {
        return Err(ProgramError::InvalidAccountData);
    }

    let mut data = account.try_borrow_mut_data()?;
    let mut record = GreetingRecord::decode(&data)?;
    record.counter = record
        .counter
        .checked_add(payload.counter)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    data[..GreetingRecord::LEN].copy_from_slice(&record.encode()?);

    msg!("Greeted {} times", record.counter);
    Ok(())
}
