//! Static weather lookup exposed to the model as `get_weather`.

use crate::invoker::{KernelFunction, Plugin, ToolDescriptor, ToolParameter};

/// Known cities and their temperature in degrees Celsius.
const TEMPERATURES: &[(&str, i32)] = &[("Los Angeles", 20), ("LA", 20), ("London", 15)];

/// Look up the current weather in a city.
///
/// Matching is exact and case-sensitive. Unknown cities are not an error:
/// the returned sentence names the requested city verbatim.
///
/// ```
/// use toolchat::plugins::get_weather;
///
/// assert_eq!(get_weather("London"), "59°F (15°C)");
/// assert_eq!(
///     get_weather("Tokyo"),
///     "The information about the weather in Tokyo is not available."
/// );
/// ```
pub fn get_weather(city: &str) -> String {
    match TEMPERATURES.iter().find(|(name, _)| *name == city) {
        Some((_, celsius)) => format_temperature(*celsius),
        None => format!("The information about the weather in {} is not available.", city),
    }
}

/// `"<F>°F (<C>°C)"`, Fahrenheit computed with truncating integer division.
fn format_temperature(celsius: i32) -> String {
    let fahrenheit = celsius * 9 / 5 + 32;
    format!("{}\u{00b0}F ({}\u{00b0}C)", fahrenheit, celsius)
}

/// Plugin exposing [`get_weather`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WeatherPlugin;

impl WeatherPlugin {
    /// Name under which the function is registered.
    pub const GET_WEATHER: &'static str = "get_weather";

    /// The `get_weather` function bound to its descriptor.
    pub fn get_weather_function() -> KernelFunction {
        KernelFunction::new(
            ToolDescriptor::new(Self::GET_WEATHER, "Gets the current weather in the city")
                .with_parameter(ToolParameter::string("city", "The name of the city")),
            |args| Ok(get_weather(args.get_str("city").unwrap_or_default())),
        )
    }
}

impl Plugin for WeatherPlugin {
    fn name(&self) -> &str {
        "weather"
    }

    fn functions(&self) -> Vec<KernelFunction> {
        vec![Self::get_weather_function()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::{FunctionRegistry, InvokerError, ToolArguments};

    #[test]
    fn test_known_cities() {
        assert_eq!(get_weather("Los Angeles"), "68°F (20°C)");
        assert_eq!(get_weather("LA"), "68°F (20°C)");
        assert_eq!(get_weather("Los Angeles"), get_weather("LA"));
        assert_eq!(get_weather("London"), "59°F (15°C)");
    }

    #[test]
    fn test_unknown_city_is_echoed_verbatim() {
        assert_eq!(
            get_weather("Tokyo"),
            "The information about the weather in Tokyo is not available."
        );
        assert_eq!(
            get_weather("  new york "),
            "The information about the weather in   new york  is not available."
        );
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        assert!(get_weather("london").contains("not available"));
        assert!(get_weather("la").contains("not available"));
    }

    #[test]
    fn test_fahrenheit_truncates() {
        // 21 * 9 / 5 = 37.8, truncated to 37
        assert_eq!(format_temperature(21), "69°F (21°C)");
        assert_eq!(format_temperature(-7), "20°F (-7°C)");
    }

    #[test]
    fn test_plugin_registers_get_weather() {
        let mut registry = FunctionRegistry::new();
        assert_eq!(WeatherPlugin.register_all(&mut registry).unwrap(), 1);

        let function = registry.get("get_weather").unwrap();
        let desc = function.descriptor();
        assert_eq!(desc.description, "Gets the current weather in the city");
        assert_eq!(desc.parameters.len(), 1);
        assert_eq!(desc.parameters[0].name, "city");
        assert_eq!(desc.parameters[0].description, "The name of the city");

        let out = registry
            .invoke("get_weather", &ToolArguments::new().with("city", "London"))
            .unwrap();
        assert_eq!(out, "59°F (15°C)");
    }

    #[test]
    fn test_missing_city_argument_is_rejected() {
        let err = WeatherPlugin::get_weather_function()
            .invoke(&ToolArguments::new())
            .unwrap_err();
        assert!(matches!(err, InvokerError::InvalidArguments { .. }));
    }
}
