use serde::Deserialize;
use time::OffsetDateTime;

use crate::domain::{Reading, Sample};

/// One response unit of `/v2/samples`: its samples and the link to the next page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub samples: Vec<Sample>,
    /// Relative or absolute location of the next page. Never an empty string.
    pub next: Option<String>,
}

#[derive(Deserialize)]
struct SamplesResponse {
    #[serde(default)]
    data: Vec<SampleResource>,
    #[serde(default)]
    links: Option<Links>,
}

#[derive(Deserialize)]
struct Links {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Deserialize)]
struct SampleResource {
    #[serde(rename = "type", default)]
    resource_type: String,
    #[serde(default)]
    id: String,
    attributes: Attributes,
}

#[derive(Deserialize)]
struct Attributes {
    #[serde(with = "time::serde::timestamp")]
    timestamp: OffsetDateTime,
    #[serde(default)]
    system_temperature: Option<f64>,
    #[serde(default)]
    energy: Vec<WireReading>,
    #[serde(default)]
    power: Vec<WireReading>,
}

#[derive(Deserialize)]
struct WireReading {
    sensor_id: String,
    value: f64,
}

impl From<WireReading> for Reading {
    fn from(r: WireReading) -> Self {
        Reading {
            sensor_id: r.sensor_id,
            value: r.value,
        }
    }
}

impl From<SampleResource> for Sample {
    fn from(r: SampleResource) -> Self {
        Sample {
            resource_type: r.resource_type,
            id: r.id,
            timestamp: r.attributes.timestamp,
            system_temperature: r.attributes.system_temperature,
            energy: r.attributes.energy.into_iter().map(Reading::from).collect(),
            power: r.attributes.power.into_iter().map(Reading::from).collect(),
        }
    }
}

impl From<SamplesResponse> for Page {
    fn from(r: SamplesResponse) -> Self {
        Page {
            samples: r.data.into_iter().map(Sample::from).collect(),
            next: r
                .links
                .and_then(|l| l.next)
                .filter(|next| !next.trim().is_empty()),
        }
    }
}

/// Decode a raw response body, keeping samples in response order.
pub fn decode_page(body: &[u8]) -> Result<Page, serde_json::Error> {
    let response: SamplesResponse = serde_json::from_slice(body)?;
    Ok(response.into())
}
