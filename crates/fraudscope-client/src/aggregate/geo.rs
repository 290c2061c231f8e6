use serde::{Deserialize, Serialize};

use crate::filter::FilteredView;
use crate::stats::{quantile_sorted, sorted_copy};
use crate::store::{GeoPoint, TransactionRecord};

/// Continental US centroid, used when the view has no customer coordinates.
pub const FALLBACK_CENTER: GeoPoint = GeoPoint {
    lat: 37.0902,
    lon: -95.7129,
};

/// Added to every heat weight so non-fraud points still register.
const HEAT_WEIGHT_FLOOR: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeoLayer {
    CustomerHeat,
    MerchantHeat,
    CustomerPoints,
    MerchantPoints,
}

impl GeoLayer {
    pub const ALL: [Self; 4] = [
        Self::CustomerHeat,
        Self::MerchantHeat,
        Self::CustomerPoints,
        Self::MerchantPoints,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CustomerHeat => "customer-heat",
            Self::MerchantHeat => "merchant-heat",
            Self::CustomerPoints => "customer-points",
            Self::MerchantPoints => "merchant-points",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|layer| layer.as_str() == value)
    }

    pub fn default_layers() -> Vec<Self> {
        vec![Self::CustomerHeat, Self::CustomerPoints]
    }

    const fn uses_merchant_location(self) -> bool {
        matches!(self, Self::MerchantHeat | Self::MerchantPoints)
    }

    fn point_for(self, record: &TransactionRecord) -> Option<GeoPoint> {
        if self.uses_merchant_location() {
            record.merchant_location
        } else {
            record.customer_location
        }
    }

    fn label_for(self, record: &TransactionRecord) -> Option<String> {
        if self.uses_merchant_location() {
            record.merchant.clone()
        } else {
            record.city.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoSample {
    pub lat: f64,
    pub lon: f64,
    pub is_fraud: bool,
    pub weight: f64,
    pub amount: f64,
    /// City for customer layers, merchant name for merchant layers.
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLayerData {
    pub layer: GeoLayer,
    pub points: Vec<GeoSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoSummary {
    pub center: GeoPoint,
    /// Requested layers in request order; a layer with no points is omitted.
    pub layers: Vec<GeoLayerData>,
}

pub fn aggregate(view: &FilteredView<'_>, layers: &[GeoLayer]) -> GeoSummary {
    let mut requested: Vec<GeoLayer> = Vec::new();
    for layer in layers {
        if !requested.contains(layer) {
            requested.push(*layer);
        }
    }

    let layers = requested
        .into_iter()
        .filter_map(|layer| {
            let points = view
                .iter()
                .filter_map(|record| {
                    let point = layer.point_for(record)?;
                    Some(GeoSample {
                        lat: point.lat,
                        lon: point.lon,
                        is_fraud: record.is_fraud,
                        weight: f64::from(record.label()) + HEAT_WEIGHT_FLOOR,
                        amount: record.amount,
                        label: layer.label_for(record),
                    })
                })
                .collect::<Vec<GeoSample>>();
            if points.is_empty() {
                return None;
            }
            Some(GeoLayerData { layer, points })
        })
        .collect();

    GeoSummary {
        center: map_center(view),
        layers,
    }
}

/// Median customer coordinate of the view.
pub fn map_center(view: &FilteredView<'_>) -> GeoPoint {
    let (lats, lons): (Vec<f64>, Vec<f64>) = view
        .iter()
        .filter_map(|record| record.customer_location)
        .map(|point| (point.lat, point.lon))
        .unzip();

    let lat = quantile_sorted(&sorted_copy(&lats), 0.5);
    let lon = quantile_sorted(&sorted_copy(&lons), 0.5);
    match (lat, lon) {
        (Some(lat), Some(lon)) => GeoPoint { lat, lon },
        _ => FALLBACK_CENTER,
    }
}
