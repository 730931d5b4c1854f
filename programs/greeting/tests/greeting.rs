use greeting_program::process_instruction;
use greeting_record::{GreetingRecord, InvocationPayload, RecordCodec};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    account::Account,
    instruction::{AccountMeta, Instruction, InstructionError},
    pubkey::Pubkey,
    signature::Signer,
    transaction::{Transaction, TransactionError},
};

async fn start_with_greeting_account(
    program_id: Pubkey,
    greeted: Pubkey,
    owner: Pubkey,
    counter: u32,
) -> ProgramTestContext {
    let mut program_test = ProgramTest::new(
        "greeting_program",
        program_id,
        processor!(process_instruction),
    );
    program_test.add_account(
        greeted,
        Account {
            lamports: 5_000_000,
            data: GreetingRecord::new(counter).encode().unwrap(),
            owner,
            ..Account::default()
        },
    );
    program_test.start_with_context().await
}

async fn greet(
    context: &mut ProgramTestContext,
    program_id: Pubkey,
    greeted: Pubkey,
    data: Vec<u8>,
) -> Result<(), BanksClientError> {
    let instruction =
        Instruction::new_with_bytes(program_id, &data, vec![AccountMeta::new(greeted, false)]);
    let blockhash = context.get_new_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&context.payer.pubkey()),
        &[&context.payer],
        blockhash,
    );
    context.banks_client.process_transaction(transaction).await
}

async fn read_counter(context: &mut ProgramTestContext, greeted: Pubkey) -> u32 {
    let account = context
        .banks_client
        .get_account(greeted)
        .await
        .unwrap()
        .unwrap();
    GreetingRecord::decode(&account.data).unwrap().counter
}

fn instruction_error(result: Result<(), BanksClientError>) -> InstructionError {
    match result.unwrap_err().unwrap() {
        TransactionError::InstructionError(0, error) => error,
        error => panic!("unexpected transaction error {:?}", error),
    }
}

#[tokio::test]
async fn test_greeting_adds_payload() {
    let program_id = Pubkey::new_unique();
    let greeted = Pubkey::new_unique();
    let mut context = start_with_greeting_account(program_id, greeted, program_id, 0).await;

    let data = InvocationPayload::new(7).encode().unwrap();
    greet(&mut context, program_id, greeted, data).await.unwrap();
    assert_eq!(read_counter(&mut context, greeted).await, 7);

    let data = InvocationPayload::new(3).encode().unwrap();
    greet(&mut context, program_id, greeted, data).await.unwrap();
    assert_eq!(read_counter(&mut context, greeted).await, 10);
}

#[tokio::test]
async fn test_greeting_rejects_foreign_account() {
    let program_id = Pubkey::new_unique();
    let greeted = Pubkey::new_unique();
    let mut context =
        start_with_greeting_account(program_id, greeted, Pubkey::new_unique(), 0).await;

    let data = InvocationPayload::new(1).encode().unwrap();
    let result = greet(&mut context, program_id, greeted, data).await;
    assert_eq!(
        instruction_error(result),
        InstructionError::IncorrectProgramId
    );
}

#[tokio::test]
async fn test_greeting_rejects_overflow() {
    let program_id = Pubkey::new_unique();
    let greeted = Pubkey::new_unique();
    let mut context =
        start_with_greeting_account(program_id, greeted, program_id, u32::MAX - 1).await;

    let data = InvocationPayload::new(2).encode().unwrap();
    let result = greet(&mut context, program_id, greeted, data).await;
    assert_eq!(
        instruction_error(result),
        InstructionError::ArithmeticOverflow
    );
    assert_eq!(read_counter(&mut context, greeted).await, u32::MAX - 1);
}

#[tokio::test]
async fn test_greeting_rejects_short_instruction_data() {
    let program_id = Pubkey::new_unique();
    let greeted = Pubkey::new_unique();
    let mut context = start_with_greeting_account(program_id, greeted, program_id, 0).await;

    let result = greet(&mut context, program_id, greeted, vec![7, 0]).await;
    assert_eq!(
        instruction_error(result),
        InstructionError::InvalidInstructionData
    );
}
