/// Page views
///
/// Each page is a plain function from state to `Element`; all state lives
/// in `crate::state` and every interaction is routed back as a `Message`.

pub mod detail;
pub mod listing;
