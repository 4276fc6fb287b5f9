mod identifiers;
mod router;

pub use identifiers::IdentifierExtractor;
pub use router::{
    DocumentRouter, ReverseIndex, RoutingReport, RoutedFile, Delivery, DeliveryStatus,
    SourceOutcome, RoutingTableRow, folder_tokens,
};
