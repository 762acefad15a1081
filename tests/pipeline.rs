// tests/pipeline.rs
use auction_listing_normalizer::{
    default_normalizer, normalize, AuctionStatus, ConditionClass, CurrencyCode, NormalizedListing,
    Platform, RawEndTime, RawListing,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::sync::Arc;

fn listing(
    platform: Platform,
    title: &str,
    description: Option<&str>,
    location: Option<&str>,
    status: Option<&str>,
    end_time: Option<&str>,
) -> RawListing {
    RawListing {
        description: description.map(str::to_string),
        location: location.map(str::to_string),
        status: status.map(str::to_string),
        end_time: end_time.map(RawEndTime::from),
        ..RawListing::new(platform, title)
    }
}

fn sample() -> Vec<RawListing> {
    vec![
        listing(
            Platform::BringATrailer,
            "2023 Porsche 911 GT3 RS",
            Some("Delivered new in California, original paint and matching numbers."),
            Some("Los Angeles, CA"),
            Some("sold"),
            Some("2025-06-15T18:00:00Z"),
        ),
        listing(
            Platform::CollectingCars,
            "1965 Jaguar E-Type Roadster",
            Some("Full rotisserie restoration completed in 2020."),
            Some("London, UK"),
            Some("ENDED"),
            Some("2025-03-01T12:30:00+01:00"),
        ),
        listing(
            Platform::CarsAndBids,
            "1990 Porsche 911 Carrera 4 Cabriolet",
            Some("LS3 engine swap with custom turbo conversion."),
            Some("Toronto, ON"),
            Some("ACTIVE"),
            Some("2025-07-01T00:00:00Z"),
        ),
        listing(Platform::CarsAndBids, "1990 Honda Civic", None, None, None, None),
        listing(
            Platform::BringATrailer,
            "2020 Ferrari GTC4Lusso",
            Some("Finished in grigio. This shooting brake has covered 9k miles."),
            Some("Monaco"),
            Some("sold"),
            Some("garbage"),
        ),
    ]
}

#[test]
fn composes_every_transform() {
    let out = normalize(&sample()[0]);
    assert_eq!(out.condition, ConditionClass::Original);
    assert_eq!(out.country_code.unwrap(), "US");
    assert_eq!(out.trim.as_deref(), Some("GT3 RS"));
    assert_eq!(out.body_style, None);
    assert_eq!(out.buyers_premium_percent, 5.0);
    assert_eq!(out.sale_date.unwrap().to_rfc3339(), "2025-06-15T18:00:00+00:00");
    assert_eq!(out.status, AuctionStatus::Sold);
    assert_eq!(out.currency, CurrencyCode::Usd);
}

#[test]
fn offsets_are_converted_to_utc() {
    let out = normalize(&sample()[1]);
    assert_eq!(out.condition, ConditionClass::Restored);
    assert_eq!(out.country_code.unwrap(), "GB");
    assert_eq!(out.body_style.as_deref(), Some("Roadster"));
    assert_eq!(out.buyers_premium_percent, 10.0);
    assert_eq!(out.currency, CurrencyCode::Gbp);
    assert_eq!(out.sale_date.unwrap().to_rfc3339(), "2025-03-01T11:30:00+00:00");
}

#[test]
fn active_and_unparseable_end_times_have_no_sale_date() {
    let s = sample();
    let active = normalize(&s[2]);
    assert_eq!(active.condition, ConditionClass::Modified);
    assert_eq!(active.country_code.unwrap(), "CA");
    assert_eq!(active.trim.as_deref(), Some("Carrera 4"));
    assert_eq!(active.body_style.as_deref(), Some("Cabriolet"));
    assert_eq!(active.sale_date, None);

    let garbage = normalize(&s[4]);
    assert_eq!(garbage.status, AuctionStatus::Sold);
    assert_eq!(garbage.sale_date, None);
    assert_eq!(garbage.country_code.unwrap(), "MC");
    assert_eq!(garbage.body_style.as_deref(), Some("Shooting Brake"));
}

#[test]
fn bare_listing_gets_neutral_values() {
    let out = normalize(&sample()[3]);
    assert_eq!(out.condition, ConditionClass::Unknown);
    assert_eq!(out.country_code, None);
    assert_eq!(out.trim, None);
    assert_eq!(out.body_style, None);
    assert_eq!(out.sale_date, None);
    assert_eq!(out.buyers_premium_percent, 4.5);
}

#[test]
fn normalization_is_idempotent() {
    for raw in sample() {
        assert_eq!(normalize(&raw), normalize(&raw), "{}", raw.title);
    }
}

#[test]
fn batch_order_does_not_change_results() {
    let raws = sample();
    let baseline: Vec<NormalizedListing> = raws.iter().map(normalize).collect();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..10 {
        let mut idx: Vec<usize> = (0..raws.len()).collect();
        idx.shuffle(&mut rng);
        let shuffled: Vec<RawListing> = idx.iter().map(|&i| raws[i].clone()).collect();
        let out = default_normalizer().normalize_batch(&shuffled);
        for (pos, &i) in idx.iter().enumerate() {
            assert_eq!(out[pos], baseline[i], "listing {i} at position {pos}");
        }
    }
}

#[tokio::test]
async fn concurrent_matches_sequential() {
    let mut raws = Vec::new();
    for _ in 0..40 {
        raws.extend(sample());
    }
    let sequential = default_normalizer().normalize_batch(&raws);

    let n = Arc::new(default_normalizer().clone());
    for workers in [1, 3, 8, 500] {
        let out = Arc::clone(&n)
            .normalize_concurrent(raws.clone(), workers)
            .await
            .unwrap();
        assert_eq!(out, sequential, "workers={workers}");
    }

    let empty = n.normalize_concurrent(Vec::new(), 4).await.unwrap();
    assert!(empty.is_empty());
}

#[test]
fn json_shape_is_camel_case() {
    let out = normalize(&sample()[0]);
    let v = serde_json::to_value(&out).unwrap();
    assert_eq!(v["condition"], "original");
    assert_eq!(v["countryCode"], "US");
    assert_eq!(v["trim"], "GT3 RS");
    assert!(v["bodyStyle"].is_null());
    assert_eq!(v["buyersPremiumPercent"], 5.0);
    assert_eq!(v["status"], "SOLD");
    assert_eq!(v["currency"], "USD");
}

#[test]
fn raw_listing_accepts_scraper_json() {
    let raw: RawListing = serde_json::from_str(
        r#"{
            "platform": "COLLECTING_CARS",
            "title": "2004 Porsche 911 GT3 RS",
            "location": "Munich, Germany",
            "status": "Sold",
            "endTime": 1718474400000,
            "currentBid": 150000,
            "rawPriceText": "€150,000"
        }"#,
    )
    .unwrap();
    let out = normalize(&raw);
    assert_eq!(out.country_code.unwrap(), "DE");
    assert_eq!(out.sale_date.unwrap().timestamp_millis(), 1_718_474_400_000);
    assert_eq!(out.currency, CurrencyCode::Eur);
    assert_eq!(out.prices.price_eur, Some(150_000.0));
    assert_eq!(out.prices.price_usd, Some(163_500.0));
    assert_eq!(out.prices.original_currency, CurrencyCode::Eur);
}
