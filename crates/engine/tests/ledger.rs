use std::{sync::Arc, time::Duration};

use sea_orm::{ConnectionTrait, Statement};
use tokio::time::Instant;

use engine::{BuyItemCmd, EngineError, OpContext, TransferCmd};

mod common;

use common::{
    add_item, coins, count_purchases, count_rows, engine_with_db, engine_with_file_db,
    open_account, single_connection,
};

// ─────────────────────────────────────────────────────────────────────────────
// Purchases
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn buy_item_charges_price_and_records_one_purchase() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;
    let jacket = add_item(&engine, "jacket", 500).await;

    engine
        .buy_item(&OpContext::new(), BuyItemCmd::new(alice, jacket))
        .await
        .unwrap();

    assert_eq!(coins(&engine, alice).await, 500);
    assert_eq!(count_purchases(&db, alice, jacket).await, 1);
}

#[tokio::test]
async fn buy_item_without_enough_coins_changes_nothing() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 100).await;
    let jacket = add_item(&engine, "jacket", 500).await;

    let err = engine
        .buy_item(&OpContext::new(), BuyItemCmd::new(alice, jacket))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InsufficientFunds(_)), "{err:?}");
    assert_eq!(coins(&engine, alice).await, 100);
    assert_eq!(count_purchases(&db, alice, jacket).await, 0);
}

#[tokio::test]
async fn buy_missing_item_is_not_found() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;

    let err = engine
        .buy_item(&OpContext::new(), BuyItemCmd::new(alice, 999_999))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::ItemNotFound("item 999999 not exists".to_string())
    );
    assert!(err.is_not_found());
    assert_eq!(coins(&engine, alice).await, 1000);
    assert_eq!(count_rows(&db, "purchases").await, 0);
}

#[tokio::test]
async fn buy_item_for_unknown_actor_is_not_found() {
    let (engine, db) = engine_with_db().await;
    let cup = add_item(&engine, "mug", 20).await;

    let err = engine
        .buy_item(&OpContext::new(), BuyItemCmd::new(4242, cup))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::AccountNotFound(_)), "{err:?}");
    assert_eq!(count_rows(&db, "purchases").await, 0);
}

#[tokio::test]
async fn spending_the_exact_balance_leaves_zero() {
    let (engine, _db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 500).await;
    let jacket = add_item(&engine, "jacket", 500).await;

    engine
        .buy_item(&OpContext::new(), BuyItemCmd::new(alice, jacket))
        .await
        .unwrap();

    assert_eq!(coins(&engine, alice).await, 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Transfers
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn transfer_moves_exactly_the_amount() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;
    let bob = open_account(&engine, "bob", 0).await;

    engine
        .transfer(&OpContext::new(), TransferCmd::new(alice, "bob", 300))
        .await
        .unwrap();

    assert_eq!(coins(&engine, alice).await, 700);
    assert_eq!(coins(&engine, bob).await, 300);
    assert_eq!(count_rows(&db, "transfers").await, 1);
}

#[tokio::test]
async fn transfer_to_unknown_handle_is_not_found() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;

    let err = engine
        .transfer(
            &OpContext::new(),
            TransferCmd::new(alice, "nonexistent-handle", 50),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::AccountNotFound("nonexistent-handle".to_string())
    );
    assert_eq!(coins(&engine, alice).await, 1000);
    assert_eq!(count_rows(&db, "transfers").await, 0);
}

#[tokio::test]
async fn unknown_recipient_is_reported_before_a_short_balance() {
    let (engine, _db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 5).await;

    let err = engine
        .transfer(&OpContext::new(), TransferCmd::new(alice, "ghost", 500))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::AccountNotFound("ghost".to_string()));
    assert_eq!(coins(&engine, alice).await, 5);
}

#[tokio::test]
async fn transfer_without_enough_coins_changes_nothing() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 100).await;
    let bob = open_account(&engine, "bob", 0).await;

    let err = engine
        .transfer(&OpContext::new(), TransferCmd::new(alice, "bob", 101))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::InsufficientFunds(_)), "{err:?}");
    assert_eq!(coins(&engine, alice).await, 100);
    assert_eq!(coins(&engine, bob).await, 0);
    assert_eq!(count_rows(&db, "transfers").await, 0);
}

#[tokio::test]
async fn zero_and_negative_amounts_are_rejected_up_front() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 100).await;
    open_account(&engine, "bob", 0).await;

    for amount in [0, -10] {
        let err = engine
            .transfer(&OpContext::new(), TransferCmd::new(alice, "bob", amount))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("amount must be > 0".to_string())
        );
    }

    assert_eq!(coins(&engine, alice).await, 100);
    assert_eq!(count_rows(&db, "transfers").await, 0);
}

#[tokio::test]
async fn transfer_to_self_is_rejected() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 100).await;

    let err = engine
        .transfer(&OpContext::new(), TransferCmd::new(alice, " alice ", 10))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::InvalidTransfer("cannot transfer coins to yourself".to_string())
    );
    assert_eq!(coins(&engine, alice).await, 100);
    assert_eq!(count_rows(&db, "transfers").await, 0);
}

#[tokio::test]
async fn repeated_transfers_are_not_deduplicated() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;
    let bob = open_account(&engine, "bob", 0).await;

    let cmd = TransferCmd::new(alice, "bob", 100);
    let first = engine
        .transfer(&OpContext::new(), cmd.clone())
        .await
        .unwrap();
    let second = engine.transfer(&OpContext::new(), cmd).await.unwrap();

    assert_ne!(first, second);
    assert_eq!(coins(&engine, alice).await, 800);
    assert_eq!(coins(&engine, bob).await, 200);
    assert_eq!(count_rows(&db, "transfers").await, 2);
}

// ─────────────────────────────────────────────────────────────────────────────
// Atomicity
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_transfer_record_rolls_back_both_balances() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;
    let bob = open_account(&engine, "bob", 0).await;

    // The debit and credit succeed, then appending the record fails.
    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "DROP TABLE transfers".to_string(),
    ))
    .await
    .unwrap();

    let err = engine
        .transfer(&OpContext::new(), TransferCmd::new(alice, "bob", 250))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Storage(_)), "{err:?}");
    assert_eq!(coins(&engine, alice).await, 1000);
    assert_eq!(coins(&engine, bob).await, 0);
}

#[tokio::test]
async fn failing_purchase_record_rolls_back_the_charge() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;
    let jacket = add_item(&engine, "jacket", 500).await;

    let backend = db.get_database_backend();
    db.execute(Statement::from_string(
        backend,
        "DROP TABLE purchases".to_string(),
    ))
    .await
    .unwrap();

    let err = engine
        .buy_item(&OpContext::new(), BuyItemCmd::new(alice, jacket))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Storage(_)), "{err:?}");
    assert_eq!(coins(&engine, alice).await, 1000);
}

#[tokio::test]
async fn cancelled_context_leaves_no_effect() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;
    let bob = open_account(&engine, "bob", 0).await;
    let jacket = add_item(&engine, "jacket", 500).await;

    let ctx = OpContext::new();
    ctx.cancel();

    let err = engine
        .transfer(&ctx, TransferCmd::new(alice, "bob", 100))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Cancelled("operation cancelled".to_string())
    );

    let err = engine
        .buy_item(&ctx, BuyItemCmd::new(alice, jacket))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Cancelled("operation cancelled".to_string())
    );

    assert_eq!(coins(&engine, alice).await, 1000);
    assert_eq!(coins(&engine, bob).await, 0);
    assert_eq!(count_rows(&db, "transfers").await, 0);
    assert_eq!(count_rows(&db, "purchases").await, 0);
}

#[tokio::test]
async fn elapsed_deadline_leaves_no_effect() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 1000).await;
    open_account(&engine, "bob", 0).await;

    let ctx = OpContext::new().with_deadline(Instant::now() - Duration::from_millis(1));
    let err = engine
        .transfer(&ctx, TransferCmd::new(alice, "bob", 100))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::Cancelled("deadline exceeded".to_string())
    );
    assert_eq!(coins(&engine, alice).await, 1000);
    assert_eq!(count_rows(&db, "transfers").await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn deadline_inside_open_transaction_rolls_it_back() {
    let dir = tempfile::tempdir().unwrap();
    let (engine, db, url) = engine_with_file_db(dir.path()).await;
    let alice = open_account(&engine, "alice", 100).await;
    let bob = open_account(&engine, "bob", 0).await;

    // Another session takes the write lock, so the transfer opens its
    // transaction and then stalls inside it.
    let locker = single_connection(&url).await;
    locker.execute_unprepared("BEGIN EXCLUSIVE").await.unwrap();
    let release = {
        let locker = locker.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(600)).await;
            locker.execute_unprepared("ROLLBACK").await.unwrap();
        })
    };

    let ctx = OpContext::new().with_timeout(Duration::from_millis(300));
    let err = engine
        .transfer(&ctx, TransferCmd::new(alice, "bob", 10))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Cancelled("deadline exceeded".to_string())
    );
    release.await.unwrap();

    assert_eq!(coins(&engine, alice).await, 100);
    assert_eq!(coins(&engine, bob).await, 0);
    assert_eq!(count_rows(&db, "transfers").await, 0);

    // The connection went back to the pool clean.
    engine
        .transfer(&OpContext::new(), TransferCmd::new(alice, "bob", 10))
        .await
        .unwrap();
    assert_eq!(coins(&engine, alice).await, 90);
    assert_eq!(coins(&engine, bob).await, 10);
}

// ─────────────────────────────────────────────────────────────────────────────
// Concurrency
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_transfers_cannot_overdraw() {
    let (engine, db) = engine_with_db().await;
    let alice = open_account(&engine, "alice", 100).await;
    let bob = open_account(&engine, "bob", 0).await;
    let carol = open_account(&engine, "carol", 0).await;

    let ctx = OpContext::new();
    let (to_bob, to_carol) = tokio::join!(
        engine.transfer(&ctx, TransferCmd::new(alice, "bob", 60)),
        engine.transfer(&ctx, TransferCmd::new(alice, "carol", 60)),
    );

    let outcomes = [to_bob, to_carol];
    let succeeded = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(succeeded, 1);
    assert!(
        outcomes
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|err| matches!(err, EngineError::InsufficientFunds(_)))
    );

    assert_eq!(coins(&engine, alice).await, 40);
    assert_eq!(
        coins(&engine, bob).await + coins(&engine, carol).await,
        60
    );
    assert_eq!(count_rows(&db, "transfers").await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_purchases_never_push_a_balance_below_zero() {
    let (engine, db) = engine_with_db().await;
    let engine = Arc::new(engine);
    let alice = open_account(&engine, "alice", 100).await;
    let sticker = add_item(&engine, "sticker", 30).await;

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..10 {
        let engine = Arc::clone(&engine);
        tasks.spawn(async move {
            engine
                .buy_item(&OpContext::new(), BuyItemCmd::new(alice, sticker))
                .await
        });
    }

    let mut bought = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => bought += 1,
            Err(EngineError::InsufficientFunds(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(bought, 3);
    assert_eq!(coins(&engine, alice).await, 10);
    assert_eq!(count_purchases(&db, alice, sticker).await, 3);
}

#[tokio::test]
async fn transfer_sequence_conserves_total_and_keeps_balances_non_negative() {
    let (engine, _db) = engine_with_db().await;
    let handles = ["alice", "bob", "carol"];
    let mut ids = Vec::new();
    for (handle, opening) in handles.iter().zip([500, 300, 200]) {
        ids.push(open_account(&engine, handle, opening).await);
    }

    // Deterministic walk mixing affordable and unaffordable transfers.
    let ctx = OpContext::new();
    for step in 0..60_usize {
        let from = step % 3;
        let to = (step * 7 + 1) % 3;
        if from == to {
            continue;
        }
        let amount = ((step * 37) % 400 + 1) as i64;
        match engine
            .transfer(&ctx, TransferCmd::new(ids[from], handles[to], amount))
            .await
        {
            Ok(_) | Err(EngineError::InsufficientFunds(_)) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }

        let mut total = 0;
        for id in &ids {
            let balance = coins(&engine, *id).await;
            assert!(balance >= 0, "negative balance after step {step}");
            total += balance;
        }
        assert_eq!(total, 1000);
    }
}
