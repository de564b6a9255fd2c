use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use relay_types::LeverageOpcode;

use crate::{
    errors::{HookError, LeverageError},
    events::LeverageEvent,
    host::FlashView,
    leverage,
    mock::{config, MockHost, HOOK, LENDER, LOAN, ORCHESTRATOR, VAULT},
};

const USER: Address = Address::repeat_byte(0x5E);

fn amount(n: u64) -> U256 {
    U256::from(n)
}

fn world() -> MockHost {
    let mut host = MockHost::default();
    host.tokens.mint(LOAN, LENDER, amount(1_000_000));
    host.tokens.mint(LOAN, VAULT, amount(1_000_000));
    host.authorized.insert((USER, HOOK));
    host
}

/// Put the orchestrator in the state it is in when it calls the hook: holding the flash loan
/// plus whatever the user provided, with the hook approved for the balance of every held token.
fn in_flight(host: &mut MockHost, flash: u64, user_loan: u64, user_shares: u64) {
    let declared: Vec<(Address, u64)> = [(LOAN, user_loan), (VAULT, user_shares)]
        .into_iter()
        .filter(|(_, n)| *n > 0)
        .collect();
    host.tokens.mint(LOAN, ORCHESTRATOR, amount(flash + user_loan));
    host.tokens.mint(VAULT, ORCHESTRATOR, amount(user_shares));
    let held = [LOAN].into_iter().chain(declared.iter().map(|(token, _)| *token));
    for token in held {
        let balance = host.tokens.balance_of(token, ORCHESTRATOR);
        host.tokens.approve(token, ORCHESTRATOR, HOOK, balance);
    }
    host.flash = FlashView {
        sender: USER,
        tokens: declared.iter().map(|(token, _)| *token).collect(),
        amounts: declared.iter().map(|(_, n)| amount(*n)).collect(),
        flash_token: LOAN,
        flash_amount: amount(flash),
    };
}

fn run(host: &mut MockHost, opcode: LeverageOpcode) -> Result<Vec<u8>, HookError> {
    leverage::run(host, &config(), ORCHESTRATOR, &[opcode as u8])
}

/// 500 shares of collateral against 300 borrowed, then 3 of interest.
fn accrued_position(host: &mut MockHost) {
    host.open_position(USER, amount(500), amount(300));
    host.totals.total_borrow_assets = amount(303);
}

fn assert_hook_empty(host: &MockHost) {
    assert_eq!(host.tokens.balance_of(LOAN, HOOK), U256::ZERO);
    assert_eq!(host.tokens.balance_of(VAULT, HOOK), U256::ZERO);
}

#[test]
fn test_increase_vaults_supplies_and_borrows_back() {
    let mut host = world();
    in_flight(&mut host, 1_000, 100, 50);

    let result = run(&mut host, LeverageOpcode::IncreaseLeverage).unwrap();
    assert_eq!(result, (amount(1_050), amount(1_000)).abi_encode_params());

    let position = host.positions[&USER];
    assert_eq!(position.collateral, amount(1_050));
    assert_eq!(position.borrow_shares, amount(1_000_000_000));
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(1_000));
    assert_eq!(host.tokens.balance_of(VAULT, ORCHESTRATOR), U256::ZERO);
    assert_eq!(host.tokens.balance_of(VAULT, LENDER), amount(1_050));
    assert_hook_empty(&host);

    match host.events.as_slice() {
        [LeverageEvent::LeverageExecuted(e)] => {
            assert_eq!(e.account, USER);
            assert_eq!(e.opcode, 0);
            assert_eq!(e.collateral, amount(1_050));
        }
        other => panic!("unexpected events: {other:?}"),
    }
}

#[test]
fn test_decrease_repays_and_covers_flash_with_collateral() {
    let mut host = world();
    host.open_position(USER, amount(1_000), amount(1_000));
    in_flight(&mut host, 440, 0, 0);

    run(&mut host, LeverageOpcode::DecreaseLeverage).unwrap();

    let position = host.positions[&USER];
    assert_eq!(position.collateral, amount(600));
    assert_eq!(position.borrow_shares, amount(560_000_000));
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(440));
    assert_hook_empty(&host);
}

#[test]
fn test_increase_ignores_undeclared_shares() {
    let mut host = world();
    in_flight(&mut host, 1_000, 100, 50);
    // Sent to the orchestrator outside the call, never approved to the hook.
    host.tokens.mint(VAULT, ORCHESTRATOR, amount(1));

    let result = run(&mut host, LeverageOpcode::IncreaseLeverage).unwrap();
    assert_eq!(result, (amount(1_050), amount(1_000)).abi_encode_params());
    assert_eq!(host.positions[&USER].collateral, amount(1_050));
    assert_eq!(host.tokens.balance_of(VAULT, ORCHESTRATOR), amount(1));
    assert_hook_empty(&host);
}

#[test]
fn test_increase_without_declared_shares_leaves_stray_balance() {
    let mut host = world();
    in_flight(&mut host, 1_000, 100, 0);
    host.tokens.mint(VAULT, ORCHESTRATOR, amount(7));

    let result = run(&mut host, LeverageOpcode::IncreaseLeverage).unwrap();
    // 1_100 loan token vaults into 1_000 shares.
    assert_eq!(result, (amount(1_000), amount(1_000)).abi_encode_params());
    assert_eq!(host.positions[&USER].collateral, amount(1_000));
    assert_eq!(host.tokens.balance_of(VAULT, ORCHESTRATOR), amount(7));
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(1_000));
    assert_hook_empty(&host);
}

#[test]
fn test_decrease_caps_repayment_at_debt() {
    let mut host = world();
    host.open_position(USER, amount(1_000), amount(300));
    in_flight(&mut host, 440, 0, 0);

    let result = run(&mut host, LeverageOpcode::DecreaseLeverage).unwrap();
    // 140 of the flash is spare after repaying 300; the other 300 costs ceil(300 / 1.1) = 273 shares.
    assert_eq!(result, (amount(273), amount(300)).abi_encode_params());

    let position = host.positions[&USER];
    assert_eq!(position.borrow_shares, U256::ZERO);
    assert_eq!(position.collateral, amount(727));
    assert_eq!(host.totals.total_borrow_shares, U256::ZERO);
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(440));
    assert_hook_empty(&host);
}

#[test]
fn test_decrease_returns_loan_beyond_debt_and_flash() {
    let mut host = world();
    host.open_position(USER, amount(1_000), amount(300));
    let before = host.tokens.balance_of(LOAN, USER);
    in_flight(&mut host, 440, 400, 0);

    let result = run(&mut host, LeverageOpcode::DecreaseLeverage).unwrap();
    assert_eq!(result, (U256::ZERO, amount(300)).abi_encode_params());

    let position = host.positions[&USER];
    assert_eq!(position.borrow_shares, U256::ZERO);
    assert_eq!(position.collateral, amount(1_000));
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(440));
    assert_eq!(host.tokens.balance_of(LOAN, USER) - before, amount(100));
    assert_hook_empty(&host);
}

#[test]
fn test_close_to_loan_zeroes_position_and_pays_equity() {
    let mut host = world();
    accrued_position(&mut host);
    let debt = leverage::debt_of(&host, &config(), USER).unwrap();
    assert_eq!(debt, amount(303));
    let before = host.tokens.balance_of(LOAN, USER);

    in_flight(&mut host, 303, 0, 0);
    let result = run(&mut host, LeverageOpcode::CloseToLoan).unwrap();
    assert_eq!(result, (amount(500), amount(303)).abi_encode_params());

    let position = host.positions[&USER];
    assert_eq!(position.collateral, U256::ZERO);
    assert_eq!(position.borrow_shares, U256::ZERO);
    let after = host.tokens.balance_of(LOAN, USER);
    assert!(after > before);
    // 500 shares redeem for 550, of which 303 repay the flash loan.
    assert_eq!(after - before, amount(247));
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(303));
    assert_hook_empty(&host);
}

#[test]
fn test_close_to_collateral_pays_equity_in_shares() {
    let mut host = world();
    accrued_position(&mut host);
    let loan_before = host.tokens.balance_of(LOAN, USER);

    in_flight(&mut host, 303, 0, 0);
    run(&mut host, LeverageOpcode::CloseToCollateral).unwrap();

    assert_eq!(host.positions[&USER].borrow_shares, U256::ZERO);
    assert_eq!(host.positions[&USER].collateral, U256::ZERO);
    // 303 loan token costs ceil(303 / 1.1) = 276 shares.
    assert_eq!(host.tokens.balance_of(VAULT, USER), amount(224));
    assert_eq!(host.tokens.balance_of(LOAN, USER), loan_before);
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(303));
    assert_hook_empty(&host);
}

#[test]
fn test_close_to_collateral_redeposits_surplus() {
    let mut host = world();
    accrued_position(&mut host);

    in_flight(&mut host, 303, 400, 0);
    run(&mut host, LeverageOpcode::CloseToCollateral).unwrap();

    // 400 surplus loan token minus 303 owed back leaves 97, vaulted as 88 shares.
    assert_eq!(host.tokens.balance_of(VAULT, USER), amount(588));
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(303));
    assert_hook_empty(&host);
}

#[test]
fn test_only_orchestrator_may_call() {
    let mut host = world();
    in_flight(&mut host, 10, 0, 0);
    let err = leverage::run(&mut host, &config(), USER, &[0]).unwrap_err();
    match err {
        HookError::Rejected(LeverageError::NotOrchestrator(e)) => assert_eq!(e.caller, USER),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_bad_opcode_and_market_are_rejected() {
    let mut host = world();
    in_flight(&mut host, 10, 0, 0);

    let err = leverage::run(&mut host, &config(), ORCHESTRATOR, &[9]).unwrap_err();
    assert!(matches!(err, HookError::Rejected(LeverageError::InvalidOpcode(_))));
    let err = leverage::run(&mut host, &config(), ORCHESTRATOR, &[]).unwrap_err();
    assert!(matches!(err, HookError::Rejected(LeverageError::MissingOpcode(_))));

    host.flash.flash_token = VAULT;
    let err = run(&mut host, LeverageOpcode::IncreaseLeverage).unwrap_err();
    assert!(matches!(err, HookError::Rejected(LeverageError::InvalidMarket(_))));
    assert_eq!(host.tokens.balance_of(LOAN, ORCHESTRATOR), amount(10));
}

#[test]
fn test_market_revert_is_bubbled() {
    let mut host = world();
    host.authorized.clear();
    in_flight(&mut host, 100, 0, 0);

    match run(&mut host, LeverageOpcode::IncreaseLeverage).unwrap_err() {
        HookError::Reverted(data) => assert_eq!(data, b"unauthorized".to_vec()),
        other => panic!("unexpected: {other:?}"),
    }
}
