//! Common test utilities

use pcsc::{Context, Scope};

use cepas_transport_pcsc::PcscDriver;

/// Try to get a real PC/SC context for tests
pub fn get_pcsc_context() -> Option<Context> {
    Context::establish(Scope::User).ok()
}

/// Try to find a real reader for tests
pub fn get_reader() -> Option<String> {
    let context = get_pcsc_context()?;
    let readers = context.list_readers_owned().ok()?;

    readers
        .first()
        .map(|reader| reader.to_string_lossy().into_owned())
}

/// Try to find a real reader that already has a card in its field
pub fn get_reader_with_card() -> Option<String> {
    PcscDriver::list_readers()
        .ok()?
        .into_iter()
        .find(|reader| reader.has_card())
        .map(|reader| reader.name().to_string())
}
