//! Pricing estimator behind the quote calculator widget.

use serde::Serialize;

/// Multiplier applied to the whole price for rush delivery.
pub const RUSH_MULTIPLIER: f64 = 1.5;
/// Revisions included in every package.
pub const INCLUDED_REVISIONS: u32 = 5;
/// Price of each revision past the included ones.
pub const EXTRA_REVISION_FEE: f64 = 10.0;
pub const MAX_REVISIONS: u32 = 20;
pub const BULK_DISCOUNT_TIERS: &[u32] = &[0, 5, 10, 15, 20];

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueService {
    pub slug: &'static str,
    pub name: &'static str,
    pub base_price: u32,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub key: &'static str,
    pub label: &'static str,
    pub multiplier: f64,
}

pub const SERVICES: &[CatalogueService] = &[
    CatalogueService { slug: "logo-design", name: "Logo Design", base_price: 149 },
    CatalogueService { slug: "business-card-design", name: "Business Card Design", base_price: 79 },
    CatalogueService { slug: "social-media-kit", name: "Social Media Kit", base_price: 199 },
    CatalogueService { slug: "flyer-print-design", name: "Flyer & Print Design", base_price: 99 },
    CatalogueService { slug: "packaging-design", name: "Packaging Design", base_price: 349 },
    CatalogueService { slug: "brand-identity", name: "Brand Identity", base_price: 499 },
    CatalogueService { slug: "website-design", name: "Website Design", base_price: 999 },
];

pub const VARIATIONS: &[Variation] = &[
    Variation { key: "basic", label: "Basic", multiplier: 1.0 },
    Variation { key: "standard", label: "Standard", multiplier: 1.5 },
    Variation { key: "premium", label: "Premium", multiplier: 2.0 },
];

/// Look a service up by slug or display name, ignoring case.
pub fn find_service(key: &str) -> Option<&'static CatalogueService> {
    let key = key.trim();
    SERVICES
        .iter()
        .find(|s| s.slug.eq_ignore_ascii_case(key) || s.name.eq_ignore_ascii_case(key))
}

pub fn find_variation(key: &str) -> Option<&'static Variation> {
    let key = key.trim();
    VARIATIONS
        .iter()
        .find(|v| v.key.eq_ignore_ascii_case(key) || v.label.eq_ignore_ascii_case(key))
}

/// Inputs of one estimate, already resolved against the catalogue.
#[derive(Debug, Clone, Copy)]
pub struct EstimateInput {
    pub base_price: u32,
    pub variation_multiplier: f64,
    pub rush: bool,
    pub revisions: u32,
    pub bulk_discount_percent: u32,
}

/// Intermediate amounts, before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Breakdown {
    pub package_price: f64,
    pub rush_fee: f64,
    pub extra_revisions: u32,
    pub revision_fee: f64,
    pub subtotal: f64,
    pub discount: f64,
    pub total: i64,
}

/// Price one package:
/// `base × variation`, `× 1.5` when rushed, `+ 10` per revision above five,
/// `× (1 − discount%)`, rounded half up.
pub fn estimate(input: &EstimateInput) -> Breakdown {
    let package_price = f64::from(input.base_price) * input.variation_multiplier;

    let mut price = package_price;
    if input.rush {
        price *= RUSH_MULTIPLIER;
    }
    let rush_fee = price - package_price;

    let extra_revisions = input.revisions.saturating_sub(INCLUDED_REVISIONS);
    let revision_fee = f64::from(extra_revisions) * EXTRA_REVISION_FEE;
    price += revision_fee;
    let subtotal = price;

    price *= 1.0 - f64::from(input.bulk_discount_percent) / 100.0;
    let discount = subtotal - price;

    Breakdown {
        package_price,
        rush_fee,
        extra_revisions,
        revision_fee,
        subtotal,
        discount,
        total: round_half_up(price),
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(base: u32, multiplier: f64, rush: bool, revisions: u32, discount: u32) -> EstimateInput {
        EstimateInput {
            base_price: base,
            variation_multiplier: multiplier,
            rush,
            revisions,
            bulk_discount_percent: discount,
        }
    }

    #[test]
    fn test_logo_standard_rounds_half_up() {
        let logo = find_service("Logo Design").unwrap();
        let standard = find_variation("standard").unwrap();
        let result = estimate(&input(logo.base_price, standard.multiplier, false, 5, 0));
        assert_eq!(result.package_price, 223.5);
        assert_eq!(result.total, 224);
    }

    #[test]
    fn test_rush_multiplies_pre_rush_price() {
        for base in [79u32, 149, 499, 999] {
            let calm = estimate(&input(base, 2.0, false, 3, 0));
            let rushed = estimate(&input(base, 2.0, true, 3, 0));
            assert_eq!(rushed.subtotal, calm.subtotal * RUSH_MULTIPLIER);
            assert_eq!(rushed.rush_fee, calm.package_price * 0.5);
        }
    }

    #[test]
    fn test_revision_fee_only_above_five() {
        for revisions in 0..=5 {
            let result = estimate(&input(100, 1.0, false, revisions, 0));
            assert_eq!(result.revision_fee, 0.0);
            assert_eq!(result.total, 100);
        }
        let result = estimate(&input(100, 1.0, false, 8, 0));
        assert_eq!(result.extra_revisions, 3);
        assert_eq!(result.total, 130);
    }

    #[test]
    fn test_revisions_added_after_rush() {
        // 100 * 1.5 = 150, +20 for two extra revisions
        let result = estimate(&input(100, 1.0, true, 7, 0));
        assert_eq!(result.total, 170);
    }

    #[test]
    fn test_discount_applies_last() {
        // 149 * 1.5 = 223.5, rush 335.25, +20 = 355.25, -10% = 319.725
        let result = estimate(&input(149, 1.5, true, 7, 10));
        assert_eq!(result.total, 320);
        assert!((result.discount - 35.525).abs() < 1e-9);
    }

    #[test]
    fn test_full_discount_is_free() {
        let result = estimate(&input(999, 2.0, true, 20, 100));
        assert_eq!(result.total, 0);
    }

    #[test]
    fn test_catalogue_lookup_ignores_case() {
        assert_eq!(find_service("LOGO-DESIGN").unwrap().base_price, 149);
        assert_eq!(find_service("website design").unwrap().base_price, 999);
        assert!(find_service("tattoo design").is_none());
        assert!(find_variation("Premium").is_some());
        assert!(find_variation("ultra").is_none());
    }
}
