//! Shared test utilities for loader tests

use crate::app::services::loader::{Loader, SheetFetcher};
use crate::app::services::normalizer::SurrogateIdGenerator;
use crate::app::services::state_reference::StateReference;
use crate::{Error, Result};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

pub mod loader_tests;

/// Fetcher serving canned bytes and recording requested URLs
pub struct StubFetcher {
    pub body: Option<Vec<u8>>,
    pub requested: Rc<RefCell<Vec<String>>>,
}

impl SheetFetcher for StubFetcher {
    fn fetch(&self, export_url: &str) -> Result<Vec<u8>> {
        self.requested.borrow_mut().push(export_url.to_string());
        self.body
            .clone()
            .ok_or_else(|| Error::fetch(export_url, "stubbed failure", None))
    }
}

pub const SAMPLE_CSV: &str = "Qty,Date,Consignee,Exporter,Consignee State,Port\n\
500 KG,2023-01-05,Acme,Global Ltd,MH,Nhava Sheva\n\
bad,2023-01-06,Acme,Global Ltd,MH,Nhava Sheva\n";

/// Loader over the built-in state table whose fetcher serves `body`
pub fn create_test_loader(body: Option<&str>) -> (Loader, Rc<RefCell<Vec<String>>>) {
    let requested = Rc::new(RefCell::new(Vec::new()));
    let fetcher = StubFetcher {
        body: body.map(|text| text.as_bytes().to_vec()),
        requested: Rc::clone(&requested),
    };
    let loader = Loader::new(
        Arc::new(StateReference::builtin()),
        SurrogateIdGenerator::new(),
        Box::new(fetcher),
    );
    (loader, requested)
}
