use std::sync::Mutex;

use async_trait::async_trait;
use folio_form_relay::{FormPayload, FormRelay, RelayError, RelayReceipt};

struct Recording {
    sent: Mutex<Vec<FormPayload>>,
    status: u16,
}

#[async_trait]
impl FormRelay for Recording {
    async fn submit(&self, payload: &FormPayload) -> Result<RelayReceipt, RelayError> {
        self.sent.lock().unwrap().push(payload.clone());
        Ok(RelayReceipt {
            status: self.status,
        })
    }

    fn endpoint(&self) -> &str {
        "memory://relay"
    }
}

/// it should accept a relay behind a trait object and hand it the three fields
#[test]
fn submit_through_dyn_relay() {
    let relay = Recording {
        sent: Mutex::new(Vec::new()),
        status: 200,
    };
    let dyn_relay: &dyn FormRelay = &relay;
    let payload = FormPayload::new("Ada", "ada@example.com", "Hi there");
    let receipt = pollster::block_on(dyn_relay.submit(&payload)).unwrap();
    assert!(receipt.is_success());
    assert_eq!(relay.sent.lock().unwrap().as_slice(), &[payload]);
}

/// it should report non-2xx statuses on the receipt without failing
#[test]
fn non_success_status_still_resolves() {
    let relay = Recording {
        sent: Mutex::new(Vec::new()),
        status: 422,
    };
    let receipt = pollster::block_on(relay.submit(&FormPayload::default())).unwrap();
    assert!(!receipt.is_success());
    assert_eq!(receipt.status, 422);
}
