// Property-based tests for payout request transitions and balances:
// completed and rejected are absorbing, refused operations leave the request untouched

use chrono::{TimeZone, Utc};
use demdem_payouts::core::AppError;
use demdem_payouts::payouts::{
    PaymentDestination, PaymentMethod, PayoutPolicy, PayoutRequest, PayoutStatus,
};
use demdem_payouts::rates::RateTable;
use demdem_payouts::transactions::{Channel, NewSale, Transaction};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Action {
    Approve,
    Reject,
    RejectWithoutReason,
    MarkReceived,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Approve),
        Just(Action::Reject),
        Just(Action::RejectWithoutReason),
        Just(Action::MarkReceived),
    ]
}

fn policy() -> PayoutPolicy {
    PayoutPolicy::new(RateTable::default())
}

fn destination() -> PaymentDestination {
    PaymentDestination::new(PaymentMethod::Wave, "+221771234567").unwrap()
}

fn apply(policy: &PayoutPolicy, request: &PayoutRequest, action: Action) -> Result<PayoutRequest, AppError> {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    match action {
        Action::Approve => policy.approve(request, at),
        Action::Reject => policy.reject(request, "Coordonnées invalides", at),
        Action::RejectWithoutReason => policy.reject(request, "", at),
        Action::MarkReceived => policy.mark_received(request, at),
    }
}

proptest! {
    /// Property: once completed or rejected, no action changes the request
    #[test]
    fn test_terminal_states_are_absorbing(actions in prop::collection::vec(action(), 1..12)) {
        let policy = policy();
        let mut request = policy
            .request_payout("org-1", 50_000, 20_000, destination(), Utc::now())
            .unwrap();

        for action in actions {
            let before = request.clone();
            match apply(&policy, &request, action) {
                Ok(next) => {
                    prop_assert!(!before.is_terminal());
                    prop_assert!(next.check_invariants().is_ok());
                    request = next;
                }
                Err(_) => prop_assert_eq!(&request, &before),
            }
        }
    }

    /// Property: a request above the balance is refused, at or below it is accepted
    #[test]
    fn test_request_bounded_by_available_balance(
        available in 0i64..10_000_000i64,
        requested in 1i64..10_000_000i64,
    ) {
        let result = policy().request_payout("org-1", available, requested, destination(), Utc::now());

        if requested > available {
            let is_insufficient = matches!(result, Err(AppError::InsufficientBalance { .. }));
            prop_assert!(is_insufficient);
        } else {
            let request = result.unwrap();
            prop_assert_eq!(request.status, PayoutStatus::Pending);
            prop_assert_eq!(request.technical_fees + request.net_amount, requested);
        }
    }

    /// Property: available balance is released net minus live reservations
    #[test]
    fn test_balance_accounts_for_reservations(
        grosses in prop::collection::vec(1i64..1_000_000i64, 1..8),
        reserve_pct in 0i64..=100i64,
    ) {
        let policy = policy();
        let created = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
        let transactions: Vec<Transaction> = grosses
            .iter()
            .map(|&gross| {
                Transaction::record_sale(
                    NewSale {
                        partner_id: "org-1".to_string(),
                        partner_name: None,
                        channel: Channel::WebGateway,
                        gross_amount: gross,
                    },
                    policy.rates(),
                    created,
                )
                .unwrap()
            })
            .collect();
        let earned: i64 = transactions.iter().map(|t| t.net_amount).sum();
        let as_of = created.date_naive();

        let reserve = earned * reserve_pct / 100;
        let mut payouts = Vec::new();
        if reserve > 0 {
            payouts.push(policy.request_payout("org-1", earned, reserve, destination(), created).unwrap());
        }

        let balance = policy.available_balance("org-1", &transactions, &payouts, as_of, false).unwrap();
        prop_assert_eq!(balance.earned_net, earned);
        prop_assert_eq!(balance.available, earned - reserve);
        prop_assert!(balance.available >= 0);
    }
}

#[test]
fn test_insufficient_balance_example() {
    let result = policy().request_payout("org-1", 5_000, 6_000, destination(), Utc::now());
    assert!(matches!(
        result,
        Err(AppError::InsufficientBalance {
            requested: 6_000,
            available: 5_000
        })
    ));
}

#[test]
fn test_reject_without_reason_keeps_pending() {
    let policy = policy();
    let request = policy
        .request_payout("org-1", 10_000, 1_000, destination(), Utc::now())
        .unwrap();

    assert!(matches!(
        policy.reject(&request, "", Utc::now()),
        Err(AppError::MissingReason)
    ));
    assert_eq!(request.status, PayoutStatus::Pending);
}

#[test]
fn test_full_lifecycle() {
    let policy = policy();
    let pending = policy
        .request_payout("org-1", 10_000, 1_000, destination(), Utc::now())
        .unwrap();
    let approved = policy.approve(&pending, Utc::now()).unwrap();
    let completed = policy.mark_received(&approved, Utc::now()).unwrap();

    assert_eq!(completed.status, PayoutStatus::Completed);
    assert!(matches!(
        policy.approve(&completed, Utc::now()),
        Err(AppError::InvalidTransition { .. })
    ));
}
