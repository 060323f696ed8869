use htlc_core::condition::digest;
use htlc_core::{
    submit, Address, Call, Escrow, EscrowParams, Event, Ledger, MemoryLedger, Receipt, Secret,
};
use proptest::prelude::*;

const EXPIRATION: u64 = 1_000;

fn party(b: u8) -> Address {
    Address::from_bytes([b; 20])
}

fn new_escrow() -> Escrow {
    Escrow::new(EscrowParams {
        refund_party: party(1),
        redeem_party: party(2),
        expiration_height: EXPIRATION,
        secret_commitment: digest(b"S"),
    })
}

fn funded(height: u64, amount: u128) -> (Escrow, MemoryLedger) {
    let mut escrow = new_escrow();
    let mut ledger = MemoryLedger::at_height(0);
    submit(
        &mut escrow,
        &mut ledger,
        &Call::Fund {
            sender: party(3),
            amount,
        },
    )
    .unwrap();
    ledger.advance_to(height).unwrap();
    (escrow, ledger)
}

/// One step of a random call sequence.
#[derive(Debug, Clone)]
enum Step {
    Advance(u64),
    Fund(u128),
    Claim(bool),
    Expire,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u64..400).prop_map(Step::Advance),
        (0u128..1_000).prop_map(Step::Fund),
        any::<bool>().prop_map(Step::Claim),
        Just(Step::Expire),
    ]
}

proptest! {
    #[test]
    fn fund_in_time_always_accepted(height in 0..=EXPIRATION, amount in 0u128..u64::MAX as u128) {
        let mut escrow = new_escrow();
        let mut ledger = MemoryLedger::at_height(height);

        let receipt = submit(&mut escrow, &mut ledger, &Call::Fund { sender: party(3), amount }).unwrap();
        prop_assert_eq!(receipt.event.code(), 2);
        prop_assert_eq!(ledger.current_balance(), amount);
    }

    #[test]
    fn fund_after_deadline_always_rejected(height in (EXPIRATION + 1)..u64::MAX, amount in 0u128..1_000) {
        let mut escrow = new_escrow();
        let mut ledger = MemoryLedger::at_height(height);

        let receipt = submit(&mut escrow, &mut ledger, &Call::Fund { sender: party(3), amount }).unwrap();
        prop_assert_eq!(receipt, Receipt::rejected(Event::NotClaimable));
        prop_assert_eq!(ledger.current_balance(), 0);
    }

    #[test]
    fn claim_pays_iff_secret_and_time(height in 0..(2 * EXPIRATION), correct in any::<bool>(), amount in 0u128..1_000) {
        let (mut escrow, mut ledger) = funded(height, amount);
        let secret: &[u8] = if correct { b"S" } else { b"not-the-secret" };

        let receipt = submit(&mut escrow, &mut ledger, &Call::Claim { secret: Secret::new(secret) }).unwrap();
        if correct && height <= EXPIRATION {
            prop_assert_eq!(receipt.event, Event::Redeemed);
            prop_assert_eq!(ledger.account_balance(&party(2)), amount);
            prop_assert_eq!(ledger.current_balance(), 0);
        } else {
            prop_assert_eq!(receipt, Receipt::rejected(Event::NotClaimable));
            prop_assert_eq!(ledger.current_balance(), amount);
        }
    }

    #[test]
    fn expire_pays_iff_deadline_passed(height in 0..(2 * EXPIRATION), amount in 0u128..1_000) {
        let (mut escrow, mut ledger) = funded(height, amount);

        let receipt = submit(&mut escrow, &mut ledger, &Call::Expire).unwrap();
        if height > EXPIRATION {
            prop_assert_eq!(receipt.event, Event::Refunded);
            prop_assert_eq!(ledger.account_balance(&party(1)), amount);
            prop_assert_eq!(ledger.current_balance(), 0);
        } else {
            prop_assert_eq!(receipt, Receipt::rejected(Event::NotRefundable));
            prop_assert_eq!(ledger.current_balance(), amount);
        }
    }

    #[test]
    fn unfunded_escrow_settles_with_zero(height in 0..(2 * EXPIRATION), correct in any::<bool>()) {
        let mut escrow = new_escrow();
        let mut ledger = MemoryLedger::at_height(height);

        let call = if height <= EXPIRATION {
            Call::Claim { secret: Secret::new(if correct { &b"S"[..] } else { &b"x"[..] }) }
        } else {
            Call::Expire
        };
        let receipt = submit(&mut escrow, &mut ledger, &call).unwrap();
        let pays = height > EXPIRATION || correct;

        prop_assert_eq!(receipt.payment.is_some(), pays);
        prop_assert_eq!(escrow.settlement().is_some(), pays);
        if let Some(payment) = receipt.payment {
            prop_assert_eq!(payment.amount, 0);
            prop_assert_eq!(payment.code, 2);
        }
    }

    #[test]
    fn at_most_one_payout(steps in proptest::collection::vec(step(), 1..40)) {
        let mut escrow = new_escrow();
        let mut ledger = MemoryLedger::at_height(0);
        let mut calls = 0usize;

        for step in steps {
            let call = match step {
                Step::Advance(by) => {
                    let next = ledger.current_height() + by;
                    ledger.advance_to(next).unwrap();
                    continue;
                }
                Step::Fund(amount) => Call::Fund { sender: party(3), amount },
                Step::Claim(correct) => Call::Claim {
                    secret: Secret::new(if correct { &b"S"[..] } else { &b"x"[..] }),
                },
                Step::Expire => Call::Expire,
            };
            submit(&mut escrow, &mut ledger, &call).unwrap();
            calls += 1;
        }

        let payouts = ledger
            .events()
            .iter()
            .filter(|e| matches!(e, Event::Redeemed | Event::Refunded))
            .count();
        prop_assert!(payouts <= 1);
        prop_assert_eq!(ledger.events().len(), calls);
        // Redeem and refund are never both paid.
        prop_assert!(ledger.account_balance(&party(1)) == 0 || ledger.account_balance(&party(2)) == 0);
        if payouts == 1 {
            prop_assert_eq!(ledger.current_balance(), 0);
        }
    }
}
