// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::RequestContext;
use crate::error::DispatchError;

fn ctx(timeout: Duration) -> RequestContext {
    RequestContext::new(&CancellationToken::new(), timeout, None)
}

#[tokio::test]
async fn completed_call_returns_value() -> anyhow::Result<()> {
    let value = ctx(Duration::from_secs(5)).run(async { Ok(42) }).await?;
    assert_eq!(value, 42);
    Ok(())
}

#[tokio::test]
async fn remote_error_is_preserved() {
    let res: Result<(), _> =
        ctx(Duration::from_secs(5)).run(async { Err(anyhow::anyhow!("boom")) }).await;
    match res {
        Err(DispatchError::Remote(e)) => assert_eq!(e.to_string(), "boom"),
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn cancelled_before_call_never_polls_remote() {
    let polled = Arc::new(AtomicBool::new(false));
    let ctx = ctx(Duration::from_secs(5));
    ctx.cancel.cancel();

    let flag = Arc::clone(&polled);
    let res = ctx
        .run(async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;

    assert!(matches!(res, Err(DispatchError::Cancelled)));
    assert!(!polled.load(Ordering::SeqCst));
}

#[tokio::test]
async fn cancel_during_call_aborts_it() {
    let ctx = ctx(Duration::from_secs(60));
    let cancel = ctx.cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        cancel.cancel();
    });

    let res = tokio::time::timeout(
        Duration::from_secs(5),
        ctx.run(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }),
    )
    .await;

    assert!(matches!(res, Ok(Err(DispatchError::Cancelled))), "got {res:?}");
}

#[tokio::test]
async fn parent_shutdown_cancels_child_context() {
    let shutdown = CancellationToken::new();
    let ctx = RequestContext::new(&shutdown, Duration::from_secs(60), None);
    shutdown.cancel();
    assert!(ctx.is_cancelled());

    let res = ctx.run(async { Ok(()) }).await;
    assert!(matches!(res, Err(DispatchError::Cancelled)));
}

#[tokio::test]
async fn deadline_expiry_times_out() {
    let ctx = ctx(Duration::from_millis(100));
    let res = ctx
        .run(async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;
    assert!(matches!(res, Err(DispatchError::TimedOut)));
}
