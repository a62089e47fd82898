//! Integration tests wiring oracles into a router as its key provider

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pera_platform::{
    ChainOracle, FixedOracle, ManufacturerOracle, OracleError, Result, key_provider,
};
use pera_router::{ProviderRegistry, Router, RouterError};

/// Oracle that always fails and counts how often it was asked
struct BrokenBridge {
    calls: Arc<AtomicUsize>,
}

impl ManufacturerOracle for BrokenBridge {
    fn name(&self) -> &str {
        "broken-bridge"
    }

    fn current_manufacturer(&self) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(OracleError::Unsupported {
            oracle: "broken-bridge".to_string(),
        })
    }
}

fn registry() -> ProviderRegistry<str> {
    ProviderRegistry::new().with("PAX", || Ok(Arc::from("pax-scanner")))
}

#[test]
fn oracle_answer_selects_provider() {
    let router = Router::new(key_provider(Arc::new(FixedOracle::new(" pax "))), registry());
    assert_eq!(router.with(|p| p.to_string()).unwrap(), "pax-scanner");
}

#[test]
fn oracle_failure_degrades_to_unknown_manufacturer() {
    let calls = Arc::new(AtomicUsize::new(0));
    let oracle = BrokenBridge {
        calls: calls.clone(),
    };
    let router = Router::new(key_provider(Arc::new(oracle)), registry());

    let err = router.provider().unwrap_err();
    assert!(matches!(err, RouterError::UnknownManufacturer { .. }));
    assert!(err.to_string().contains("unknown"));

    // Each failed access asks the oracle again
    router.provider().unwrap_err();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn chain_falls_through_to_working_oracle() {
    let calls = Arc::new(AtomicUsize::new(0));
    let chain = ChainOracle::new()
        .push(BrokenBridge {
            calls: calls.clone(),
        })
        .push(FixedOracle::new("Pax"));
    let router = Router::new(key_provider(Arc::new(chain)), registry());

    assert!(router.provider().is_ok());
    assert_eq!(router.resolved_key().map(|k| k.as_str()), Some("PAX"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
