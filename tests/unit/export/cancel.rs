use super::*;

#[tokio::test(start_paused = true)]
async fn sleep_completes_when_not_cancelled() {
    let token = CancelToken::new();
    let start = tokio::time::Instant::now();
    token.sleep(Duration::from_millis(250)).await.unwrap();
    assert!(start.elapsed() >= Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn cancel_interrupts_a_long_sleep() {
    let token = CancelToken::new();
    let remote = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        remote.cancel();
    });
    let start = tokio::time::Instant::now();
    let err = token.sleep(Duration::from_secs(60)).await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn already_cancelled_tokens_fail_fast() {
    let token = CancelToken::new();
    token.cancel();
    assert!(token.check().is_err());
    assert!(token.run(async { 1 }).await.is_err());
    token.cancelled().await;
}
