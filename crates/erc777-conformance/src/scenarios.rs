//! Operator scenarios
//!
//! Each scenario starts from a fresh token with the initial amount minted to
//! every account. `a1`, `a2` and `a3` are `accounts[1..=3]`; `accounts[0]`
//! only mints.

use erc777_primitives::Address;

use crate::harness::{expect_revert, format_account, TestContext};
use crate::ConformanceResult;

/// Placeholder symbol used before a token is deployed
pub(crate) const PLACEHOLDER_SYMBOL: &str = "tokens";

/// Names substituted into scenario titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Holder
    pub a1: String,
    /// Recipient
    pub a2: String,
    /// Operator
    pub a3: String,
    /// Token symbol
    pub symbol: String,
}

impl Labels {
    /// Labels from a chain's account list; missing accounts fall back to
    /// their role names
    pub fn new(accounts: &[Address], symbol: &str) -> Self {
        let label = |index: usize| {
            accounts
                .get(index)
                .map(format_account)
                .unwrap_or_else(|| format!("a{}", index))
        };
        Self {
            a1: label(1),
            a2: label(2),
            a3: label(3),
            symbol: symbol.to_string(),
        }
    }

    /// Role names only, for listing scenarios without a chain
    pub fn placeholder() -> Self {
        Self::new(&[], PLACEHOLDER_SYMBOL)
    }
}

/// One operator conformance scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// `a3` is not an operator for `a1` initially
    DetectNotOperator,
    /// `a1` authorizes `a3`
    AuthorizeOperator,
    /// Authorized `a3` moves 1.12 from `a1` to `a2`
    OperatorSend,
    /// `a1` revokes `a3` again
    RevokeOperator,
    /// Unauthorized `a3` cannot move funds of `a1`
    RejectUnauthorizedSend,
    /// `a3` cannot authorize itself
    RejectSelfAuthorize,
    /// Every holder is its own operator
    SelfIsOperator,
    /// `a3` cannot revoke itself
    RejectSelfRevoke,
    /// `a3` may `operatorSend` its own funds
    SelfOperatorSend,
    /// A revoked operator cannot move funds
    RejectRevokedSend,
    /// Authorization by `a1` grants nothing over `a2`
    OperatorScopedToHolder,
}

impl Scenario {
    /// Every scenario, in execution order
    pub const ALL: [Scenario; 11] = [
        Scenario::DetectNotOperator,
        Scenario::AuthorizeOperator,
        Scenario::OperatorSend,
        Scenario::RevokeOperator,
        Scenario::RejectUnauthorizedSend,
        Scenario::RejectSelfAuthorize,
        Scenario::SelfIsOperator,
        Scenario::RejectSelfRevoke,
        Scenario::SelfOperatorSend,
        Scenario::RejectRevokedSend,
        Scenario::OperatorScopedToHolder,
    ];

    /// Stable identifier, usable as a filter
    pub fn id(&self) -> &'static str {
        match self {
            Scenario::DetectNotOperator => "detect-not-operator",
            Scenario::AuthorizeOperator => "authorize-operator",
            Scenario::OperatorSend => "operator-send",
            Scenario::RevokeOperator => "revoke-operator",
            Scenario::RejectUnauthorizedSend => "reject-unauthorized-send",
            Scenario::RejectSelfAuthorize => "reject-self-authorize",
            Scenario::SelfIsOperator => "self-is-operator",
            Scenario::RejectSelfRevoke => "reject-self-revoke",
            Scenario::SelfOperatorSend => "self-operator-send",
            Scenario::RejectRevokedSend => "reject-revoked-send",
            Scenario::OperatorScopedToHolder => "operator-scoped-to-holder",
        }
    }

    /// Human-readable title
    pub fn title(&self, labels: &Labels) -> String {
        let Labels { a1, a2, a3, symbol } = labels;
        match self {
            Scenario::DetectNotOperator => {
                format!("should detect {} is not an operator for {}", a3, a1)
            }
            Scenario::AuthorizeOperator => {
                format!("should authorize {} as an operator for {}", a3, a1)
            }
            Scenario::OperatorSend => {
                format!("should let {} send 1.12 {} from {} to {}", a3, symbol, a1, a2)
            }
            Scenario::RevokeOperator => {
                format!("should revoke {} as an operator for {}", a3, a1)
            }
            Scenario::RejectUnauthorizedSend => {
                format!("should not let {} send from {} (not operator)", a3, a1)
            }
            Scenario::RejectSelfAuthorize => format!(
                "should not let {} authorize himself as one of his own operators",
                a3
            ),
            Scenario::SelfIsOperator => {
                format!("should make {} an operator for himself by default", a3)
            }
            Scenario::RejectSelfRevoke => format!(
                "should not let {} revoke himself as one of his own operators",
                a3
            ),
            Scenario::SelfOperatorSend => {
                format!("should let {} use operatorSend on himself", a3)
            }
            Scenario::RejectRevokedSend => {
                format!("should not let {} send from {} after being revoked", a3, a1)
            }
            Scenario::OperatorScopedToHolder => {
                format!("should scope {} as an operator of {} only", a3, a1)
            }
        }
    }

    /// Whether `filter` selects this scenario (id or title substring,
    /// case-insensitive)
    pub fn matches(&self, filter: &str, labels: &Labels) -> bool {
        let filter = filter.to_lowercase();
        self.id().contains(&filter) || self.title(labels).to_lowercase().contains(&filter)
    }

    /// Run against a prepared context
    pub async fn run(&self, ctx: &TestContext) -> ConformanceResult<()> {
        let token = ctx.token();
        let (a1, a2, a3) = (ctx.account(1), ctx.account(2), ctx.account(3));

        match self {
            Scenario::DetectNotOperator => ctx.assert_operator(a3, a1, false).await,

            Scenario::AuthorizeOperator => {
                token.authorize_operator(a3, ctx.opts(a1)).await?;
                ctx.assert_operator(a3, a1, true).await
            }

            Scenario::OperatorSend => {
                token.authorize_operator(a3, ctx.opts(a1)).await?;

                ctx.assert_initial_supply().await?;
                ctx.assert_initial_balances(&[a1, a2]).await?;

                token
                    .operator_send(a1, a2, ctx.amount("1.12")?, &[], &[], ctx.opts(a3))
                    .await?;

                ctx.get_block().await?;
                ctx.assert_initial_supply().await?;
                ctx.assert_balance(a1, ctx.debited("1.12")?).await?;
                ctx.assert_balance(a2, ctx.credited("1.12")?).await
            }

            Scenario::RevokeOperator => {
                token.authorize_operator(a3, ctx.opts(a1)).await?;
                ctx.assert_operator(a3, a1, true).await?;

                token.revoke_operator(a3, ctx.opts(a1)).await?;

                ctx.get_block().await?;
                ctx.assert_operator(a3, a1, false).await
            }

            Scenario::RejectUnauthorizedSend => {
                ctx.assert_initial_supply().await?;
                ctx.assert_initial_balances(&[a1, a2]).await?;

                expect_revert(
                    "operatorSend by a non-operator",
                    token
                        .operator_send(a1, a2, ctx.amount("3.72")?, &[], &[], ctx.opts(a3))
                        .await,
                )?;

                ctx.get_block().await?;
                ctx.assert_initial_supply().await?;
                ctx.assert_initial_balances(&[a1, a2]).await?;
                ctx.assert_operator(a3, a1, false).await
            }

            Scenario::RejectSelfAuthorize => {
                ctx.assert_initial_supply().await?;
                ctx.assert_initial_balances(&[a3]).await?;

                expect_revert(
                    "authorizeOperator on self",
                    token.authorize_operator(a3, ctx.opts(a3)).await,
                )?;

                ctx.get_block().await?;
                ctx.assert_initial_supply().await?;
                ctx.assert_initial_balances(&[a3]).await?;
                ctx.assert_operator(a3, a3, true).await
            }

            Scenario::SelfIsOperator => ctx.assert_operator(a3, a3, true).await,

            Scenario::RejectSelfRevoke => {
                ctx.assert_initial_supply().await?;
                ctx.assert_initial_balances(&[a3]).await?;

                expect_revert(
                    "revokeOperator on self",
                    token.revoke_operator(a3, ctx.opts(a3)).await,
                )?;

                ctx.get_block().await?;
                ctx.assert_initial_supply().await?;
                ctx.assert_initial_balances(&[a3]).await?;
                ctx.assert_operator(a3, a3, true).await
            }

            Scenario::SelfOperatorSend => {
                ctx.assert_initial_supply().await?;
                ctx.assert_initial_balances(&[a3, a2]).await?;

                token
                    .operator_send(a3, a2, ctx.amount("3.72")?, &[], &[], ctx.opts(a3))
                    .await?;

                ctx.get_block().await?;
                ctx.assert_initial_supply().await?;
                ctx.assert_balance(a3, ctx.debited("3.72")?).await?;
                ctx.assert_balance(a2, ctx.credited("3.72")?).await
            }

            Scenario::RejectRevokedSend => {
                token.authorize_operator(a3, ctx.opts(a1)).await?;
                token.revoke_operator(a3, ctx.opts(a1)).await?;
                ctx.get_block().await?;

                let before = ctx.snapshot(&[a1, a2, a3]).await?;
                expect_revert(
                    "operatorSend by a revoked operator",
                    token
                        .operator_send(a1, a2, ctx.amount("1.12")?, &[], &[], ctx.opts(a3))
                        .await,
                )?;

                ctx.get_block().await?;
                ctx.assert_operator(a3, a1, false).await?;
                ctx.assert_unchanged(&before).await
            }

            Scenario::OperatorScopedToHolder => {
                token.authorize_operator(a3, ctx.opts(a1)).await?;
                ctx.assert_operator(a3, a1, true).await?;
                ctx.assert_operator(a3, a2, false).await?;

                let before = ctx.snapshot(&[a1, a2, a3]).await?;
                expect_revert(
                    "operatorSend from a holder that never authorized the caller",
                    token
                        .operator_send(a2, a1, ctx.amount("1.12")?, &[], &[], ctx.opts(a3))
                        .await,
                )?;

                ctx.get_block().await?;
                ctx.assert_unchanged(&before).await
            }
        }
    }
}
