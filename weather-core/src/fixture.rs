use crate::{Result, codec, model::WeatherReport};

/// Canned retrieval response served by the simulated remote.
pub const FIXTURE_JSON: &str = r#"
[
  {
    "city": "Bogotá",
    "temperature": 18.3,
    "condition": "Lluvia ligera"
  },
  {
    "city": "Medellín",
    "temperature": 24.1,
    "condition": "Soleado"
  },
  {
    "city": "Cali",
    "temperature": 29.0,
    "condition": "Nublado"
  },
  {
    "city": "Cartagena",
    "temperature": 31.7,
    "condition": "Caluroso y húmedo"
  },
  {
    "city": "Barranquilla",
    "temperature": 30.4,
    "condition": "Soleado con brisa"
  },
  {
    "city": "Pasto",
    "temperature": 14.2,
    "condition": "Frío y lluvioso"
  },
  {
    "city": "Manizales",
    "temperature": 17.0,
    "condition": "Niebla parcial"
  },
  {
    "city": "Armenia",
    "temperature": 22.5,
    "condition": "Clima templado"
  }
]"#;

pub fn fixture_reports() -> Result<Vec<WeatherReport>> {
    codec::decode_json_collection(FIXTURE_JSON)
}
