//! SAME message fields and the header which carries them

mod event;
mod header;
mod location;
mod originator;
mod significance;

pub use event::{EventCode, UnrecognizedEventCode};
pub use header::{
    normalize_station, HeaderBreakdown, HeaderError, SameHeader, END_OF_MESSAGE, HEADER_PREFIX,
    MAX_LOCATIONS, STATION_ID_LEN,
};
pub use location::{InvalidLocationCode, LocationCode, LOCATION_CODE_LEN};
pub use originator::{Originator, UnknownOriginator};
pub use significance::SignificanceLevel;
