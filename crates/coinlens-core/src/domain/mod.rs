mod asset;
mod series;
mod timestamp;
mod window;

pub use asset::{Asset, AssetCatalog};
pub use series::{PricePoint, Series};
pub use timestamp::UtcDateTime;
pub use window::Window;
