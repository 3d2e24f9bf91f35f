use std::collections::BTreeMap;

use crate::config::SQFT_PER_ACRE;
use crate::error::BausError;
use crate::params::BausParams;
use crate::proforma::*;
use crate::tables::*;
use crate::test_harness::{building, residential_zoning, TestRegion};

fn zero_cost_params() -> BausParams {
    let mut params = BausParams::default();
    for tiers in params.proforma.cost_tiers.values_mut() {
        *tiers = vec![CostTier {
            max_stories: None,
            cost_per_sqft: 0.0,
        }];
    }
    params
}

fn far_zoning(max_far: f64, allowed: AllowedUses) -> Zoning {
    Zoning {
        max_far: Some(max_far),
        allowed,
        ..Default::default()
    }
}

fn parcel_with_sqft(id: u64, sqft: f64, zoning: Zoning) -> Parcel {
    Parcel {
        id: ParcelId(id),
        acres: sqft / SQFT_PER_ACRE,
        zone_id: ZoneId(1),
        zoning,
    }
}

fn flat_rents(rent: f64) -> RentTable {
    let mut rents = RentTable::new();
    for u in Use::ALL {
        rents.set_zone(ZoneId(1), u, RentQuote::Rent(rent));
    }
    rents
}

fn evaluate(
    parcel: &Parcel,
    form: BuildingForm,
    rents: &RentTable,
    params: &BausParams,
) -> Option<FeasibilityResult> {
    evaluate_parcel_form(parcel, &ParcelDevelopment::default(), form, rents, params).unwrap()
}

// -------------------------------------------------------------------------
// Intensity search
// -------------------------------------------------------------------------

#[test]
fn test_far_cap_binds_with_zero_cost() {
    let params = zero_cost_params();
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::residential_only()));
    let row = evaluate(&parcel, BuildingForm::Residential, &flat_rents(30.0), &params).unwrap();

    assert_eq!(row.far, 2.0);
    assert!((row.building_sqft - 20_000.0).abs() < 1e-6);
    assert!((row.profit - 30.0 * 20_000.0).abs() < 1e-4);
    assert_eq!(row.cost, 0.0);
    assert_eq!(row.residential_units, 20);
}

#[test]
fn test_price_quote_is_capitalized() {
    let params = zero_cost_params();
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::residential_only()));
    let mut rents = RentTable::new();
    rents.set_parcel(ParcelId(1), Use::Residential, RentQuote::Price(600.0));
    let row = evaluate(&parcel, BuildingForm::Residential, &rents, &params).unwrap();
    assert!((row.profit - 600_000.0).abs() < 1e-4);
}

#[test]
fn test_height_limit_binds() {
    let params = zero_cost_params();
    let zoning = Zoning {
        max_far: Some(10.0),
        max_height: Some(36.0),
        allowed: AllowedUses::residential_only(),
        ..Default::default()
    };
    let parcel = parcel_with_sqft(1, 10_000.0, zoning);
    let row = evaluate(&parcel, BuildingForm::Residential, &flat_rents(30.0), &params).unwrap();
    // Three 12 ft stories at 80% coverage.
    assert!((row.far - 2.4).abs() < 1e-12);
}

#[test]
fn test_density_limit_binds_for_housing() {
    let params = zero_cost_params();
    let parcel = parcel_with_sqft(1, 43_560.0, residential_zoning(43.56));
    let row = evaluate(&parcel, BuildingForm::Residential, &flat_rents(30.0), &params).unwrap();
    assert!((row.far - 1.0).abs() < 1e-9);
    assert_eq!(row.residential_units, 44);
}

#[test]
fn test_cost_step_above_low_rise_pulls_optimum_down() {
    let mut params = BausParams::default();
    params.proforma.profit_factor = 1.0;
    params.proforma.cost_tiers.insert(
        Use::Residential,
        vec![
            CostTier {
                max_stories: Some(1),
                cost_per_sqft: 5.0,
            },
            CostTier {
                max_stories: Some(4),
                cost_per_sqft: 9.0,
            },
            CostTier {
                max_stories: None,
                cost_per_sqft: 20.0,
            },
        ],
    );
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(10.0, AllowedUses::residential_only()));
    let row = evaluate(&parcel, BuildingForm::Residential, &flat_rents(10.0), &params).unwrap();
    // 0.75 FAR stays on one story: 5 $/sqft margin beats 1 $/sqft on 4 stories.
    assert_eq!(row.far, 0.75);
    assert!((row.profit - 5.0 * 7_500.0).abs() < 1e-6);
}

// -------------------------------------------------------------------------
// Filters
// -------------------------------------------------------------------------

#[test]
fn test_only_built_drops_unprofitable_forms() {
    let mut params = BausParams::default();
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::residential_only()));
    assert!(evaluate(&parcel, BuildingForm::Residential, &flat_rents(5.0), &params).is_none());

    params.proforma.only_built = false;
    let row = evaluate(&parcel, BuildingForm::Residential, &flat_rents(5.0), &params).unwrap();
    assert!(row.profit <= 0.0);
}

#[test]
fn test_only_built_rows_are_strictly_profitable() {
    let params = BausParams::default();
    let mut region = TestRegion::new();
    for i in 0..40u64 {
        let zoning = Zoning {
            max_dua: Some((i % 7) as f64 * 15.0),
            max_far: Some((i % 5) as f64),
            max_height: None,
            allowed: AllowedUses::ALL,
            nodev: i % 11 == 0,
        };
        region = region.with_parcel(i, 0.2 + (i % 4) as f64 * 0.5, 1, zoning);
    }
    let region = region.build();
    for rent in [4.0, 9.0, 12.0, 40.0] {
        let table = evaluate_feasibility(
            &region.parcels,
            &region.buildings,
            &flat_rents(rent),
            &BuildingForm::ALL,
            &params,
        )
        .unwrap();
        assert!(table.rows.iter().all(|r| r.profit > 0.0));
    }
}

#[test]
fn test_historic_parcel_forced_to_zero() {
    let mut params = zero_cost_params();
    params.proforma.only_built = false;
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::residential_only()));
    let old = building(1, 1, BuildingType::SingleFamily, 1, 0.0, 1925);
    let development = ParcelDevelopment::from_buildings(&[&old], &params).unwrap();

    let row = evaluate_parcel_form(
        &parcel,
        &development,
        BuildingForm::Residential,
        &flat_rents(100.0),
        &params,
    )
    .unwrap()
    .unwrap();
    assert!(row.historic);
    assert_eq!(row.far, 0.0);
    assert_eq!(row.profit, 0.0);

    params.proforma.only_built = true;
    assert!(evaluate_parcel_form(
        &parcel,
        &development,
        BuildingForm::Residential,
        &flat_rents(100.0),
        &params,
    )
    .unwrap()
    .is_none());
}

#[test]
fn test_parcel_size_thresholds() {
    let mut params = zero_cost_params();
    params.proforma.max_parcel_sqft = Some(50_000.0);
    let region = TestRegion::new()
        .with_parcel_record(parcel_with_sqft(
            1,
            1_500.0,
            far_zoning(2.0, AllowedUses::residential_only()),
        ))
        .with_parcel_record(parcel_with_sqft(
            2,
            10_000.0,
            far_zoning(2.0, AllowedUses::residential_only()),
        ))
        .with_parcel_record(parcel_with_sqft(
            3,
            80_000.0,
            far_zoning(2.0, AllowedUses::residential_only()),
        ))
        .build();
    let table = evaluate_feasibility(
        &region.parcels,
        &region.buildings,
        &flat_rents(30.0),
        &[BuildingForm::Residential],
        &params,
    )
    .unwrap();
    let ids: Vec<ParcelId> = table.rows.iter().map(|r| r.parcel_id).collect();
    assert_eq!(ids, vec![ParcelId(2)]);
}

#[test]
fn test_missing_rent_skips_form() {
    let params = zero_cost_params();
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::ALL));
    let mut rents = RentTable::new();
    rents.set_zone(ZoneId(1), Use::Residential, RentQuote::Rent(30.0));
    assert!(evaluate(&parcel, BuildingForm::Office, &rents, &params).is_none());
    // Mixed residential also needs a retail rent.
    assert!(evaluate(&parcel, BuildingForm::MixedResidential, &rents, &params).is_none());
    assert!(evaluate(&parcel, BuildingForm::Residential, &rents, &params).is_some());
}

#[test]
fn test_disallowed_and_nodev_parcels_produce_nothing() {
    let params = zero_cost_params();
    let office_only = parcel_with_sqft(
        1,
        10_000.0,
        far_zoning(
            2.0,
            AllowedUses {
                office: true,
                ..AllowedUses::NONE
            },
        ),
    );
    assert!(evaluate(&office_only, BuildingForm::Residential, &flat_rents(30.0), &params).is_none());
    assert!(
        evaluate(&office_only, BuildingForm::MixedOffice, &flat_rents(30.0), &params).is_none()
    );
    assert!(evaluate(&office_only, BuildingForm::Office, &flat_rents(30.0), &params).is_some());

    let mut nodev = far_zoning(2.0, AllowedUses::ALL);
    nodev.nodev = true;
    let parcel = parcel_with_sqft(2, 10_000.0, nodev);
    for form in BuildingForm::ALL {
        assert!(evaluate(&parcel, form, &flat_rents(30.0), &params).is_none());
    }
}

#[test]
fn test_non_finite_or_negative_rent_is_error() {
    let params = BausParams::default();
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::residential_only()));
    for bad in [RentQuote::Rent(f64::NAN), RentQuote::Rent(-5.0), RentQuote::Price(f64::INFINITY)]
    {
        let rents = move |_: &Parcel, _: Use| Some(bad);
        let result = evaluate_parcel_form(
            &parcel,
            &ParcelDevelopment::default(),
            BuildingForm::Residential,
            &rents,
            &params,
        );
        assert!(
            matches!(
                result,
                Err(BausError::InvalidRent {
                    parcel: ParcelId(1),
                    use_: Use::Residential,
                    ..
                })
            ),
            "{bad:?} gave {result:?}"
        );
    }
}

#[test]
fn test_closure_rent_source() {
    let params = zero_cost_params();
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(1.0, AllowedUses::ALL));
    let rents = |_: &Parcel, use_: Use| match use_ {
        Use::Office => Some(RentQuote::Rent(40.0)),
        _ => None,
    };
    let row = evaluate_parcel_form(
        &parcel,
        &ParcelDevelopment::default(),
        BuildingForm::Office,
        &rents,
        &params,
    )
    .unwrap()
    .unwrap();
    assert!((row.revenue - 400_000.0).abs() < 1e-4);
    assert!(row.job_spaces > 0);
    assert_eq!(row.residential_units, 0);
}

// -------------------------------------------------------------------------
// Policy
// -------------------------------------------------------------------------

#[test]
fn test_inclusionary_share_discounts_residential_revenue() {
    let mut params = zero_cost_params();
    params.policy.inclusionary_share = BTreeMap::from([(ZoneId(1), 0.2)]);
    params.policy.affordable_rent_discount = 0.5;
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::residential_only()));
    let row = evaluate(&parcel, BuildingForm::Residential, &flat_rents(30.0), &params).unwrap();
    assert!((row.revenue - 0.9 * 600_000.0).abs() < 1e-4);
}

#[test]
fn test_subsidy_adds_to_profit() {
    let mut params = BausParams::default();
    params.policy.subsidy_per_unit = BTreeMap::from([(ZoneId(1), 10_000.0)]);
    let parcel = parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::residential_only()));

    // Unprofitable at market rent alone.
    let without = {
        let mut p = params.clone();
        p.policy.subsidy_per_unit.clear();
        evaluate(&parcel, BuildingForm::Residential, &flat_rents(5.0), &p)
    };
    assert!(without.is_none());

    let with = evaluate(&parcel, BuildingForm::Residential, &flat_rents(5.0), &params).unwrap();
    assert!(with.profit > 0.0);
}

// -------------------------------------------------------------------------
// Table helpers
// -------------------------------------------------------------------------

#[test]
fn test_best_form_per_parcel() {
    let params = zero_cost_params();
    let region = TestRegion::new()
        .with_parcel_record(parcel_with_sqft(1, 10_000.0, far_zoning(2.0, AllowedUses::ALL)))
        .build();
    let mut rents = flat_rents(30.0);
    rents.set_zone(ZoneId(1), Use::Office, RentQuote::Rent(45.0));
    let table = evaluate_feasibility(
        &region.parcels,
        &region.buildings,
        &rents,
        &BuildingForm::ALL,
        &params,
    )
    .unwrap();
    assert!(table.len() > 1);

    let best = table.best_form_per_parcel(|_| true);
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].form, BuildingForm::Office);

    let best_res = table.best_form_per_parcel(BuildingForm::is_residential);
    assert!(best_res[0].form.is_residential());
}

#[test]
fn test_table_exports_json() {
    let params = zero_cost_params();
    let region = TestRegion::new()
        .with_parcel_record(parcel_with_sqft(
            1,
            10_000.0,
            far_zoning(2.0, AllowedUses::residential_only()),
        ))
        .build();
    let table = evaluate_feasibility(
        &region.parcels,
        &region.buildings,
        &flat_rents(30.0),
        &[BuildingForm::Residential],
        &params,
    )
    .unwrap();
    let json = table.to_json().unwrap();
    assert!(json.contains("\"form\":\"Residential\""), "got: {json}");
}

#[test]
fn test_default_config_validates() {
    ProFormaConfig::default().validate().unwrap();
}

#[test]
fn test_config_requires_unbounded_last_tier() {
    let mut config = ProFormaConfig::default();
    config.cost_tiers.insert(
        Use::Retail,
        vec![CostTier {
            max_stories: Some(3),
            cost_per_sqft: 8.0,
        }],
    );
    assert!(config.validate().is_err());
}
