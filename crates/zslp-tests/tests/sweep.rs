//! Paper-wallet sweeps in each of the three states.

use zslp_core::traits::PassthroughAddresses;
use zslp_core::types::OutputTarget;
use zslp_tests::helpers::*;
use zslp_wallet::{Engine, PaperUtxos, SweepRequest, SweepState, WalletConfig, WalletError};

fn engine(log: &CallLog) -> Engine<RecordingBroadcaster, PassthroughAddresses> {
    Engine::new(
        WalletConfig::default(),
        RecordingBroadcaster::new(log),
        PassthroughAddresses,
    )
    .unwrap()
}

fn request(paper: PaperUtxos, with_token: bool) -> SweepRequest {
    SweepRequest {
        wif: PAPER_WIF.into(),
        paper,
        native_destination: "zs1wallet".into(),
        token_destination: "zs1wallettok".into(),
        token_id: with_token.then_some(TOKEN_ID),
        token_decimals: with_token.then_some(0),
        own_utxos: Vec::new(),
    }
}

#[tokio::test]
async fn native_only_drains_into_one_output() {
    init_tracing();
    let log = CallLog::default();
    let engine = engine(&log);
    let req = request(PaperUtxos::group(vec![paper_native(1, 3_000), paper_native(2, 4_000)]), false);
    assert_eq!(req.state().unwrap(), SweepState::NativeOnly);

    let sent = engine.sweep(&req, || RecordingAssembler::new(&log)).await.unwrap();

    assert_eq!(sent.fee, 374);
    assert_eq!(
        log.outputs(),
        vec![(OutputTarget::Address("zs1wallet".into()), 7_000 - 374)]
    );
    assert_eq!(log.signatures(), vec![(0, paper_key()), (1, paper_key())]);
}

#[tokio::test]
async fn token_with_native_pays_its_own_fee() {
    let log = CallLog::default();
    let engine = engine(&log);
    let req = request(
        PaperUtxos::group(vec![
            paper_token(1, TOKEN_ID, 30),
            paper_token(2, TOKEN_ID, 12),
            paper_native(3, 6_000),
        ]),
        true,
    );
    assert_eq!(req.state().unwrap(), SweepState::TokenWithNative);

    let sent = engine.sweep(&req, || RecordingAssembler::new(&log)).await.unwrap();

    let outputs = log.outputs();
    assert_eq!(outputs.len(), 3);
    assert_eq!(outputs[1], (OutputTarget::Address("zs1wallettok".into()), 546));
    assert_eq!(outputs[2].0, OutputTarget::Address("zs1wallet".into()));
    let paid: u64 = outputs.iter().map(|(_, sats)| sats).sum();
    assert_eq!(paid + sent.fee, 546 + 546 + 6_000);
    assert!(log.signatures().iter().all(|(_, key)| *key == paper_key()));
}

#[tokio::test]
async fn wallet_funded_sweep_signs_paper_inputs_first() {
    let log = CallLog::default();
    let engine = engine(&log);
    let mut req = request(PaperUtxos::group(vec![paper_token(1, TOKEN_ID, 42)]), true);
    req.own_utxos = vec![native(10, 1_200), native(11, 1_200)];
    assert_eq!(req.state().unwrap(), SweepState::TokenWalletFunded);

    engine.sweep(&req, || RecordingAssembler::new(&log)).await.unwrap();

    assert_eq!(
        log.signatures(),
        vec![(0, paper_key()), (1, wallet_key(10)), (2, wallet_key(11))]
    );
    assert_eq!(log.publish_count(), 1);
}

#[tokio::test]
async fn minting_baton_is_never_swept() {
    let mut baton = paper_token(1, TOKEN_ID, 0);
    if let Some(t) = baton.token.as_mut() {
        t.is_minting_baton = true;
    }
    let paper = PaperUtxos::group(vec![baton, paper_native(2, 5_000)]);
    assert!(paper.tokens.is_empty());

    let log = CallLog::default();
    let engine = engine(&log);
    engine.sweep(&request(paper, false), || RecordingAssembler::new(&log)).await.unwrap();
    assert_eq!(log.signatures().len(), 1);
}

#[tokio::test]
async fn empty_paper_wallet_fails_without_port_calls() {
    let log = CallLog::default();
    let engine = engine(&log);
    let err = engine
        .sweep(&request(PaperUtxos::default(), false), || RecordingAssembler::new(&log))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidSweepParams(_)));
    assert!(log.is_empty());
}
