//! Conversion between [`WeatherReport`] and its two wire encodings.
//!
//! - XML: the submission channel. One `<WeatherReport>` root with `city`,
//!   `temperature` and `condition` children, in that order.
//! - JSON: the retrieval channel. A flat array of objects with the same keys.

use crate::{Result, WeatherError, model::WeatherReport};

const XML: &str = "XML";
const JSON: &str = "JSON";

/// Encode a report as the XML submission payload.
pub fn encode_xml(report: &WeatherReport) -> Result<Vec<u8>> {
    check_encodable(XML, report)?;
    quick_xml::se::to_string(report)
        .map(String::into_bytes)
        .map_err(|e| WeatherError::encode(XML, e))
}

/// Decode a single report from an XML submission payload.
pub fn decode_xml(payload: &str) -> Result<WeatherReport> {
    let report: WeatherReport =
        quick_xml::de::from_str(payload).map_err(|e| WeatherError::decode(XML, e))?;
    if report.city.is_empty() {
        return Err(WeatherError::decode(XML, "empty city"));
    }
    Ok(report)
}

pub fn encode_json_collection(reports: &[WeatherReport]) -> Result<String> {
    for report in reports {
        check_encodable(JSON, report)?;
    }
    serde_json::to_string(reports).map_err(|e| WeatherError::encode(JSON, e))
}

/// Decode a JSON array of reports.
///
/// All or nothing: a malformed document, or any element with a missing key or
/// a mistyped value or an empty city, fails the whole decode. Unknown keys
/// are ignored.
pub fn decode_json_collection(payload: &str) -> Result<Vec<WeatherReport>> {
    let reports: Vec<WeatherReport> =
        serde_json::from_str(payload).map_err(|e| WeatherError::decode(JSON, e))?;
    if let Some(index) = reports.iter().position(|r| r.city.is_empty()) {
        return Err(WeatherError::decode(JSON, format!("element {index} has an empty city")));
    }
    Ok(reports)
}

/// First report whose `city` matches exactly (case-sensitive).
pub fn find_by_city<'a>(reports: &'a [WeatherReport], city: &str) -> Result<&'a WeatherReport> {
    reports
        .iter()
        .find(|r| r.city == city)
        .ok_or_else(|| WeatherError::NotFound { city: city.to_string() })
}

// Neither format has a decodable spelling for NaN or infinity.
fn check_encodable(format: &'static str, report: &WeatherReport) -> Result<()> {
    if !report.temperature.is_finite() {
        return Err(WeatherError::encode(
            format,
            format!("temperature for {} is not a finite number", report.city),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<WeatherReport> {
        vec![
            WeatherReport::new("Bogotá", 18.3, "Lluvia ligera"),
            WeatherReport::new("Armenia", 22.5, "Clima templado"),
        ]
    }

    #[test]
    fn encode_xml_orders_fields_under_single_root() {
        let report = WeatherReport::new("Guatemala", 23.5, "Windy");
        let xml = String::from_utf8(encode_xml(&report).unwrap()).unwrap();

        assert_eq!(
            xml,
            "<WeatherReport><city>Guatemala</city><temperature>23.5</temperature>\
             <condition>Windy</condition></WeatherReport>"
        );
    }

    #[test]
    fn xml_payload_survives_markup_characters() {
        let report = WeatherReport::new("Santa Marta", -1.25, "Rain & <gusts>");
        let xml = String::from_utf8(encode_xml(&report).unwrap()).unwrap();

        assert!(!xml.contains("<gusts>"));
        assert_eq!(decode_xml(&xml).unwrap(), report);
    }

    #[test]
    fn decode_xml_rejects_non_numeric_temperature() {
        let payload = "<WeatherReport><city>Cali</city><temperature>warm</temperature>\
                       <condition>Nublado</condition></WeatherReport>";
        let err = decode_xml(payload).unwrap_err();
        assert!(matches!(err, WeatherError::Decode { format: "XML", .. }));
    }

    #[test]
    fn encoders_reject_non_finite_temperature() {
        for temperature in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let report = WeatherReport::new("Cali", temperature, "Hot");

            let err = encode_xml(&report).unwrap_err();
            assert!(matches!(err, WeatherError::Encode { format: "XML", .. }));

            let err = encode_json_collection(&[report]).unwrap_err();
            assert!(matches!(err, WeatherError::Encode { format: "JSON", .. }));
        }
    }

    #[test]
    fn decoders_reject_empty_city() {
        let json = r#"[
            {"city": "Cali", "temperature": 29.0, "condition": "Nublado"},
            {"city": "", "temperature": 14.2, "condition": "Frío y lluvioso"}
        ]"#;
        let err = decode_json_collection(json).unwrap_err();
        assert!(matches!(err, WeatherError::Decode { format: "JSON", .. }));
        assert!(err.to_string().contains("element 1"));

        let xml = "<WeatherReport><city></city><temperature>1.0</temperature>\
                   <condition>Nublado</condition></WeatherReport>";
        assert!(matches!(decode_xml(xml), Err(WeatherError::Decode { format: "XML", .. })));
    }

    #[test]
    fn single_report_flat_array_decodes_back_to_itself() {
        let report = WeatherReport::new("Pasto", 14.2, "Frío y lluvioso");
        let json = encode_json_collection(std::slice::from_ref(&report)).unwrap();

        let decoded = decode_json_collection(&json).unwrap();
        assert_eq!(decoded, vec![report]);
    }

    #[test]
    fn decode_preserves_source_order() {
        let json = encode_json_collection(&sample()).unwrap();
        let cities: Vec<_> = decode_json_collection(&json)
            .unwrap()
            .into_iter()
            .map(|r| r.city)
            .collect();
        assert_eq!(cities, ["Bogotá", "Armenia"]);
    }

    #[test]
    fn decode_fails_when_any_element_lacks_temperature() {
        let json = r#"[
            {"city": "Cali", "temperature": 29.0, "condition": "Nublado"},
            {"city": "Pasto", "condition": "Frío y lluvioso"}
        ]"#;
        let err = decode_json_collection(json).unwrap_err();

        assert!(matches!(err, WeatherError::Decode { format: "JSON", .. }));
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn decode_ignores_unknown_keys() {
        let json = r#"[{"city": "Cali", "temperature": 29.0, "condition": "Nublado", "foo": 1}]"#;
        let decoded = decode_json_collection(json).unwrap();
        assert_eq!(decoded, vec![WeatherReport::new("Cali", 29.0, "Nublado")]);
    }

    #[test]
    fn decode_rejects_string_temperature() {
        let json = r#"[{"city": "Cali", "temperature": "29.0", "condition": "Nublado"}]"#;
        assert!(matches!(
            decode_json_collection(json),
            Err(WeatherError::Decode { .. })
        ));
    }

    #[test]
    fn decode_rejects_malformed_text() {
        assert!(decode_json_collection("[{\"city\": ").is_err());
        assert!(decode_json_collection("{}").is_err());
    }

    #[test]
    fn decode_accepts_empty_array() {
        assert!(decode_json_collection("[]").unwrap().is_empty());
    }

    #[test]
    fn find_by_city_returns_match() {
        let reports = sample();
        let found = find_by_city(&reports, "Armenia").unwrap();
        assert_eq!(found.temperature, 22.5);
        assert_eq!(found.condition, "Clima templado");
    }

    #[test]
    fn find_by_city_reports_missing_city() {
        let reports = sample();
        let err = find_by_city(&reports, "Nowhere").unwrap_err();
        assert!(matches!(err, WeatherError::NotFound { ref city } if city == "Nowhere"));
    }

    #[test]
    fn find_by_city_is_case_sensitive() {
        assert!(find_by_city(&sample(), "armenia").is_err());
    }

    #[test]
    fn find_by_city_first_match_wins() {
        let mut reports = sample();
        reports.push(WeatherReport::new("Armenia", 10.0, "Duplicado"));

        let found = find_by_city(&reports, "Armenia").unwrap();
        assert_eq!(found.condition, "Clima templado");
    }
}
