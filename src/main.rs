//! Wagering Core Simulation.
//!
//! Walks both engines through their full lifecycles: event creation, betting,
//! resolution and pro-rata payouts, cancellation refunds, and the insurance
//! purchase / claim / settlement flow.

use rust_decimal_macros::dec;
use wager_core::*;

fn main() {
    println!("Wagering Core Engine Simulation");
    println!("Market + Insurance, Escrow Accounting, Full Lifecycle\n");

    scenario_1_market_lifecycle();
    scenario_2_cancellation_refunds();
    scenario_3_insurance_lifecycle();
    scenario_4_slip_transfer();

    println!("\nAll simulations completed successfully.");
}

/// Create, bet, resolve, claim. Winners split the full pool pro rata.
fn scenario_1_market_lifecycle() {
    println!("Scenario 1: Market Lifecycle\n");

    let admin = AccountId(1);
    let alice = AccountId(10);
    let bob = AccountId(11);
    let carol = AccountId(12);

    let mut engine = MarketEngine::new(admin, EngineConfig::default());
    let mut book = SlipBook::new();

    let event_id = engine
        .create_event(admin, "Match 1", vec!["Team A".into(), "Team B".into()], 86_400)
        .unwrap();
    println!("  Admin creates {event_id}: Team A vs Team B, 24h");

    let a1 = engine.place_bet(alice, event_id, 0, Quote::new(dec!(1.0))).unwrap();
    let a2 = engine.place_bet(bob, event_id, 0, Quote::new(dec!(3.0))).unwrap();
    let b1 = engine.place_bet(carol, event_id, 1, Quote::new(dec!(4.0))).unwrap();
    for (bet_id, account) in [(a1, alice), (a2, bob), (b1, carol)] {
        let slip = engine.get_bet(bet_id).unwrap().slip_id;
        book.mint(slip, account).unwrap();
    }

    let details = engine.event_details(event_id).unwrap();
    println!("  Stakes in: total pool {}, Team A pool {}, Team B pool {}",
        details.total_pool, details.pools[0], details.pools[1]);

    engine.resolve_event(admin, event_id, 0).unwrap();
    println!("  Resolved: Team A wins");

    let p1 = engine.claim_payout(alice, event_id, a1, &book).unwrap();
    let p2 = engine.claim_payout(bob, event_id, a2, &book).unwrap();
    println!("  Alice claims {} (staked 1.0)", p1.amount);
    println!("  Bob claims {} (staked 3.0)", p2.amount);

    let carol_result = engine.claim_payout(carol, event_id, b1, &book);
    println!("  Carol's losing claim: {}", carol_result.unwrap_err());

    let event = engine.get_event(event_id).unwrap();
    println!("  Escrow held after payouts: {}\n", event.escrow.held());
}

/// Cancellation routes every bet through the refund path, once each.
fn scenario_2_cancellation_refunds() {
    println!("Scenario 2: Cancellation Refunds\n");

    let admin = AccountId(1);
    let alice = AccountId(10);

    let mut engine = MarketEngine::new(admin, EngineConfig::default());
    let mut book = SlipBook::new();

    let event_id = engine
        .create_event(admin, "Match 2", vec!["Home".into(), "Away".into()], 3_600)
        .unwrap();
    let bet_id = engine.place_bet(alice, event_id, 0, Quote::new(dec!(1.0))).unwrap();
    book.mint(engine.get_bet(bet_id).unwrap().slip_id, alice).unwrap();

    engine.cancel_event(admin, event_id).unwrap();
    println!("  Admin cancels {event_id}");

    let refund = engine.claim_refund(alice, event_id, bet_id, &book).unwrap();
    println!("  Alice refunded exactly her stake: {}", refund.amount);

    let second = engine.claim_refund(alice, event_id, bet_id, &book);
    println!("  Second refund attempt: {}\n", second.unwrap_err());
}

/// Purchase, claim, settle. Approved claims pay the insured amount from the pool.
fn scenario_3_insurance_lifecycle() {
    println!("Scenario 3: Insurance Lifecycle\n");

    let admin = AccountId(1);
    let alice = AccountId(10);

    let mut engine = InsuranceEngine::new(admin, EngineConfig::default());
    engine.fund_pool(admin, Quote::new(dec!(100))).unwrap();
    println!("  Pool funded with 100");

    let slip = SlipId(1);
    let insured = Quote::new(dec!(1.0));
    let premium = engine.calculate_premium(alice, insured).unwrap();
    println!("  Premium quote for coverage 1.0: {premium}");

    engine.purchase_insurance(alice, slip, insured, premium).unwrap();
    println!("  Alice insures {slip}, pool now holds {}", engine.pool_held());

    engine.file_claim(alice, slip).unwrap();
    println!("  Alice files a claim");

    let settlement = engine.settle_claim(admin, slip, true).unwrap();
    println!("  Admin approves, {} paid out, pool now holds {}",
        settlement.amount_paid, engine.pool_held());

    let again = engine.settle_claim(admin, slip, true);
    println!("  Re-settlement attempt: {}\n", again.unwrap_err());
}

/// The slip is the position: transferring it moves the payout right.
fn scenario_4_slip_transfer() {
    println!("Scenario 4: Slip Transfer\n");

    let admin = AccountId(1);
    let alice = AccountId(10);
    let bob = AccountId(11);

    let mut engine = MarketEngine::new(admin, EngineConfig::default());
    let mut book = SlipBook::new();

    let event_id = engine
        .create_event(admin, "Match 3", vec!["Red".into(), "Blue".into()], 3_600)
        .unwrap();
    let bet_id = engine.place_bet(alice, event_id, 0, Quote::new(dec!(2.0))).unwrap();
    let slip = engine.get_bet(bet_id).unwrap().slip_id;
    book.mint(slip, alice).unwrap();

    book.transfer(slip, alice, bob).unwrap();
    println!("  Alice sells {slip} to Bob");

    engine.resolve_event(admin, event_id, 0).unwrap();

    let denied = engine.claim_payout(alice, event_id, bet_id, &book);
    println!("  Alice's claim after the sale: {}", denied.unwrap_err());

    let payout = engine.claim_payout(bob, event_id, bet_id, &book).unwrap();
    println!("  Bob claims {} as the new holder", payout.amount);
}
