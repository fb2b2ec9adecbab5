//! Built-in tool plugins.
//!
//! - [`WeatherPlugin`]: `get_weather(city)`, a static lookup table
//! - [`TimePlugin`]: date and time functions over a [`Clock`]

mod time;
mod weather;

pub use time::{Clock, FixedClock, SystemClock, TimePlugin};
pub use weather::{get_weather, WeatherPlugin};
