//! Sunlight avoidance: exposure simulation, destination search and the
//! decision policy that ties them together

pub mod exposure;
pub mod hideout;
pub mod policy;
pub mod refuge;
pub mod safety;

pub use exposure::{estimate_exposure, ExposureEstimate};
pub use policy::{Assessment, ShelterPolicy};
pub use refuge::determine_home_point;
pub use safety::is_destination_safe;
