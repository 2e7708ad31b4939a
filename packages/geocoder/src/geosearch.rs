//! Municipal geosearch client.
//!
//! The service accepts a free-text `query`, a `bbox` search window, and a
//! target `srsName`, and answers with a `GeoJSON` `FeatureCollection`.
//! Only the first feature is used.

use immo_noise_geocoder_models::{BoundingBox, Coordinate, ReferenceSystem};

use crate::{GeocodeError, GeosearchConfig, GeosearchHit};

/// Searches for the best-ranked feature matching `address`.
///
/// Returns `Ok(None)` when the provider answers with zero features.
///
/// # Errors
///
/// Returns [`GeocodeError`] if the HTTP request fails, the service answers
/// with a non-success status, or the response is malformed.
pub async fn search(
    client: &reqwest::Client,
    config: &GeosearchConfig,
    address: &str,
    system: ReferenceSystem,
) -> Result<Option<GeosearchHit>, GeocodeError> {
    let bbox = config.bbox_for(system).to_query_param();

    let resp = client
        .get(&config.base_url)
        .query(&[
            ("bbox", bbox.as_str()),
            ("outputformat", "json"),
            ("srsName", system.epsg()),
            ("count", "1"),
            ("query", address),
        ])
        .header("Accept", "application/json")
        .header("X-Requested-With", "XMLHttpRequest")
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(GeocodeError::Status {
            status: resp.status().as_u16(),
        });
    }

    let body: serde_json::Value = resp.json().await?;
    parse_response(&body, system)
}

/// Resolves `address` to a single coordinate, or `None`.
///
/// Every failure (network, zero features, malformed body) collapses to
/// `None`; the cause is logged at debug level.
pub async fn resolve(
    client: &reqwest::Client,
    config: &GeosearchConfig,
    address: &str,
    system: ReferenceSystem,
) -> Option<Coordinate> {
    match search(client, config, address, system).await {
        Ok(Some(hit)) => Some(hit.coordinate),
        Ok(None) => {
            log::debug!("Geosearch found no match for '{address}' ({system})");
            None
        }
        Err(e) => {
            log::debug!("Geosearch failed for '{address}' ({system}): {e}");
            None
        }
    }
}

/// Parses a geosearch `FeatureCollection`.
fn parse_response(
    body: &serde_json::Value,
    system: ReferenceSystem,
) -> Result<Option<GeosearchHit>, GeocodeError> {
    let features = body
        .get("features")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Geosearch response missing 'features' array".to_string(),
        })?;

    let Some(first) = features.first() else {
        return Ok(None);
    };

    let coords = first
        .pointer("/geometry/coordinates")
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| GeocodeError::Parse {
            message: "Feature missing geometry.coordinates".to_string(),
        })?;

    if coords.len() < 2 {
        return Err(GeocodeError::Parse {
            message: "coordinates array has fewer than 2 elements".to_string(),
        });
    }

    let x = coords[0].as_f64().ok_or_else(|| GeocodeError::Parse {
        message: "x coordinate is not a number".to_string(),
    })?;
    let y = coords[1].as_f64().ok_or_else(|| GeocodeError::Parse {
        message: "y coordinate is not a number".to_string(),
    })?;

    let bbox = first
        .get("bbox")
        .and_then(serde_json::Value::as_array)
        .and_then(|values| {
            values
                .iter()
                .map(serde_json::Value::as_f64)
                .collect::<Option<Vec<f64>>>()
        })
        .and_then(|values| BoundingBox::from_slice(&values));

    let matched_address = first
        .pointer("/properties/text")
        .and_then(serde_json::Value::as_str)
        .map(String::from);

    Ok(Some(GeosearchHit {
        coordinate: Coordinate {
            latitude: y,
            longitude: x,
            system,
        },
        bbox,
        matched_address,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wgs84_point() {
        let body = serde_json::json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [13.4132, 52.5219] },
                "properties": { "text": "Alexanderplatz 1, 10178 Berlin" }
            }]
        });

        let hit = parse_response(&body, ReferenceSystem::Wgs84)
            .unwrap()
            .unwrap();
        assert!((hit.coordinate.latitude - 52.5219).abs() < 1e-6);
        assert!((hit.coordinate.longitude - 13.4132).abs() < 1e-6);
        assert_eq!(hit.coordinate.system, ReferenceSystem::Wgs84);
        assert_eq!(
            hit.matched_address.as_deref(),
            Some("Alexanderplatz 1, 10178 Berlin")
        );
        assert!(hit.bbox.is_none());
    }

    #[test]
    fn parses_projected_bbox() {
        let body = serde_json::json!({
            "features": [{
                "bbox": [392_300.5, 5_820_100.0, 392_310.5, 5_820_110.0],
                "geometry": { "coordinates": [392_305.5, 5_820_105.0] }
            }]
        });

        let hit = parse_response(&body, ReferenceSystem::Utm33)
            .unwrap()
            .unwrap();
        let bbox = hit.bbox.unwrap();
        assert_eq!(bbox.to_query_param(), "392300.5,5820100,392310.5,5820110");
        assert_eq!(hit.coordinate.system, ReferenceSystem::Utm33);
    }

    #[test]
    fn takes_first_feature_only() {
        let body = serde_json::json!({
            "features": [
                { "geometry": { "coordinates": [13.1, 52.1] } },
                { "geometry": { "coordinates": [13.9, 52.9] } }
            ]
        });

        let hit = parse_response(&body, ReferenceSystem::Wgs84)
            .unwrap()
            .unwrap();
        assert!((hit.coordinate.longitude - 13.1).abs() < 1e-9);
    }

    #[test]
    fn empty_features_is_no_match() {
        let body = serde_json::json!({ "features": [] });
        assert!(parse_response(&body, ReferenceSystem::Wgs84)
            .unwrap()
            .is_none());
    }

    #[test]
    fn missing_features_is_parse_error() {
        let body = serde_json::json!({ "error": "bad query" });
        assert!(matches!(
            parse_response(&body, ReferenceSystem::Wgs84),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn short_coordinates_is_parse_error() {
        let body = serde_json::json!({
            "features": [{ "geometry": { "coordinates": [13.4] } }]
        });
        assert!(parse_response(&body, ReferenceSystem::Wgs84).is_err());
    }
}
