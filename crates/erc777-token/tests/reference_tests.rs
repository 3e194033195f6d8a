//! Reference token behaviour through the `OperatorToken` seam

use erc777_primitives::{parse_units, Address, U256};
use erc777_token::{
    Chain, OperatorToken, ReferenceChain, ReferenceToken, SendOptions, TokenError, TokenEvent,
};

fn units(value: &str) -> U256 {
    parse_units(value, 18).unwrap()
}

async fn funded() -> (ReferenceToken, Vec<Address>) {
    let chain = ReferenceChain::new();
    let token = chain.deploy_default().unwrap();
    let accounts = chain.accounts().await.unwrap();
    for holder in &accounts {
        token
            .mint(*holder, units("10"), SendOptions::new(accounts[0], 100_000))
            .await
            .unwrap();
    }
    (token, accounts)
}

async fn assert_supply_matches_balances(token: &ReferenceToken, accounts: &[Address]) {
    let mut sum = U256::zero();
    for holder in accounts {
        sum += token.balance_of(*holder).await.unwrap();
    }
    assert_eq!(token.total_supply().await.unwrap(), sum);
}

#[tokio::test]
async fn test_delegated_send_moves_exact_amount() {
    let (token, a) = funded().await;
    token
        .authorize_operator(a[3], SendOptions::from(a[1]))
        .await
        .unwrap();

    let receipt = token
        .operator_send(a[1], a[2], units("1.12"), &[], &[], SendOptions::from(a[3]))
        .await
        .unwrap();

    assert_eq!(token.balance_of(a[1]).await.unwrap(), units("8.88"));
    assert_eq!(token.balance_of(a[2]).await.unwrap(), units("11.12"));
    assert_eq!(
        token.total_supply().await.unwrap(),
        units("10") * U256::from(a.len())
    );
    assert!(matches!(
        receipt.events.as_slice(),
        [TokenEvent::Sent { operator, from, to, .. }] if *operator == a[3] && *from == a[1] && *to == a[2]
    ));
    assert_supply_matches_balances(&token, &a).await;
}

#[tokio::test]
async fn test_operator_lifecycle() {
    let (token, a) = funded().await;
    assert!(!token.is_operator_for(a[3], a[1]).await.unwrap());

    token
        .authorize_operator(a[3], SendOptions::from(a[1]))
        .await
        .unwrap();
    assert!(token.is_operator_for(a[3], a[1]).await.unwrap());

    // authorizing twice is idempotent
    token
        .authorize_operator(a[3], SendOptions::from(a[1]))
        .await
        .unwrap();
    assert!(token.is_operator_for(a[3], a[1]).await.unwrap());

    token
        .revoke_operator(a[3], SendOptions::from(a[1]))
        .await
        .unwrap();
    assert!(!token.is_operator_for(a[3], a[1]).await.unwrap());

    let err = token
        .operator_send(a[1], a[2], units("1"), &[], &[], SendOptions::from(a[3]))
        .await
        .unwrap_err();
    assert!(err.is_revert());
    assert_eq!(token.balance_of(a[1]).await.unwrap(), units("10"));
}

#[tokio::test]
async fn test_rejections_leave_state_untouched() {
    let (token, a) = funded().await;
    let before = token.ledger();

    let rejected = [
        token
            .authorize_operator(a[3], SendOptions::from(a[3]))
            .await,
        token.revoke_operator(a[3], SendOptions::from(a[3])).await,
        token
            .operator_send(a[1], a[2], units("3.72"), &[], &[], SendOptions::from(a[3]))
            .await,
        token
            .operator_send(a[3], a[2], units("10.01"), &[], &[], SendOptions::from(a[3]))
            .await,
        token
            .operator_send(a[3], Address::ZERO, units("1"), &[], &[], SendOptions::from(a[3]))
            .await,
        token.mint(a[1], units("1"), SendOptions::from(a[1])).await,
        token
            .mint(Address::ZERO, units("1"), SendOptions::from(a[0]))
            .await,
    ];
    for result in rejected {
        assert!(matches!(result, Err(TokenError::Reverted { reason: Some(_) })));
    }

    let after = token.ledger();
    assert_eq!(after.total_supply(), before.total_supply());
    for holder in &a {
        assert_eq!(after.balance_of(holder), before.balance_of(holder));
    }
    assert!(token.is_operator_for(a[3], a[3]).await.unwrap());
    assert_supply_matches_balances(&token, &a).await;
}

#[tokio::test]
async fn test_self_send_without_authorization() {
    let (token, a) = funded().await;
    token
        .operator_send(a[3], a[2], units("3.72"), &[], &[], SendOptions::from(a[3]))
        .await
        .unwrap();

    assert_eq!(token.balance_of(a[3]).await.unwrap(), units("6.28"));
    assert_eq!(token.balance_of(a[2]).await.unwrap(), units("13.72"));
}

#[tokio::test]
async fn test_granular_token() {
    let chain = ReferenceChain::new();
    let token = chain.deploy("GRN", units("0.01")).unwrap();
    let a = chain.accounts().await.unwrap();

    assert_eq!(token.granularity().await.unwrap(), units("0.01"));
    assert_eq!(token.symbol().await.unwrap(), "GRN");

    token
        .mint(a[1], units("1"), SendOptions::from(a[0]))
        .await
        .unwrap();
    let err = token
        .operator_send(a[1], a[2], units("0.001"), &[], &[], SendOptions::from(a[1]))
        .await
        .unwrap_err();
    assert!(err.is_revert());
}
