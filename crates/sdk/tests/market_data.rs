//! End-to-end decode pipeline over the embedded interface document.
//!
//! Fixture return values are ABI-encoded with the dynamic codec and decoded
//! back through the same path the pipeline uses for eth_call results, so
//! the tests exercise the real wire shapes without a node.

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt},
    primitives::{Address, B256, I256, U256},
};
use fastnum::{D256, dec256};
use perpsv2_sdk::{
    abi, decode,
    pipe::{ALL_MARKET_SUMMARIES, MARKET_DETAILS},
    state::{MarketBatch, MarketDetails, MarketSummary},
    types::StateInstant,
};

fn bytes32(text: &str) -> DynSolValue {
    let mut word = [0u8; 32];
    word[..text.len()].copy_from_slice(text.as_bytes());
    DynSolValue::FixedBytes(B256::new(word), 32)
}

fn uwad(units: u64) -> DynSolValue {
    DynSolValue::Uint(U256::from(units) * U256::from(10u64).pow(U256::from(18u64)), 256)
}

fn iwad(units: i64) -> DynSolValue {
    let wad = I256::try_from(10u128.pow(18)).unwrap();
    DynSolValue::Int(I256::try_from(units).unwrap() * wad, 256)
}

fn fee_rates() -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Uint(U256::from(3_000_000_000_000_000u64), 256), // takerFee 0.003
        DynSolValue::Uint(U256::from(1_000_000_000_000_000u64), 256), // makerFee 0.001
        DynSolValue::Uint(U256::from(2_000_000_000_000_000u64), 256),
        DynSolValue::Uint(U256::from(500_000_000_000_000u64), 256),
        DynSolValue::Uint(U256::from(1_000_000_000_000_000u64), 256), // offchain taker
        DynSolValue::Uint(U256::from(200_000_000_000_000u64), 256),   // offchain maker
    ])
}

fn summary_element(
    market: Address,
    asset: &str,
    key: &str,
    price: u64,
    size: u64,
    skew: i64,
) -> DynSolValue {
    DynSolValue::Tuple(vec![
        DynSolValue::Address(market),
        bytes32(asset),
        bytes32(key),
        uwad(25),
        uwad(price),
        uwad(size),
        iwad(skew),
        uwad(1_000_000),
        DynSolValue::Int(I256::try_from(3_600_000_000_000_000i64).unwrap(), 256), // 0.0036
        DynSolValue::Int(I256::try_from(900_000_000_000_000i64).unwrap(), 256),   // 0.0009
        fee_rates(),
    ])
}

/// Encode `output` as the function's return data, then decode it the way
/// the pipeline decodes eth_call results.
fn roundtrip(function_name: &str, output: DynSolValue) -> DynSolValue {
    let abi = abi::perps_v2_market_data().unwrap();
    let function = abi.function(function_name).unwrap().first().unwrap();
    let returndata = DynSolValue::Tuple(vec![output]).abi_encode_params();
    let mut outputs = function.abi_decode_output(&returndata).unwrap();
    assert_eq!(outputs.len(), 1);
    outputs.remove(0)
}

#[test]
fn summary_names_follow_declaration_order() {
    let abi = abi::perps_v2_market_data().unwrap();
    let names = decode::extract_names(&abi, ALL_MARKET_SUMMARIES).unwrap();
    assert_eq!(
        names,
        [
            "market",
            "asset",
            "key",
            "maxLeverage",
            "price",
            "marketSize",
            "marketSkew",
            "marketDebt",
            "currentFundingRate",
            "currentFundingVelocity",
            "takerFee",
            "makerFee",
            "takerFeeDelayedOrder",
            "makerFeeDelayedOrder",
            "takerFeeOffchainDelayedOrder",
            "makerFeeOffchainDelayedOrder",
        ]
    );
}

#[test]
fn details_names_surface_doubly_nested_leaves() {
    let abi = abi::perps_v2_market_data().unwrap();
    let names = decode::extract_names(&abi, MARKET_DETAILS).unwrap();
    assert_eq!(
        names,
        [
            "market",
            "baseAsset",
            "marketKey",
            "takerFee",
            "makerFee",
            "takerFeeDelayedOrder",
            "makerFeeDelayedOrder",
            "takerFeeOffchainDelayedOrder",
            "makerFeeOffchainDelayedOrder",
            "maxLeverage",
            "maxMarketValue",
            "maxFundingVelocity",
            "skewScale",
            "marketSize",
            "long",
            "short",
            "marketDebt",
            "marketSkew",
            "price",
            "invalid",
        ]
    );
}

#[test]
fn decodes_market_summaries_batch() {
    let eth = Address::repeat_byte(0x11);
    let btc = Address::repeat_byte(0x22);
    let output = DynSolValue::Array(vec![
        summary_element(eth, "sETH", "sETHPERP", 2000, 1000, 200),
        summary_element(btc, "sBTC", "sBTCPERP", 40000, 100, -10),
    ]);

    let abi = abi::perps_v2_market_data().unwrap();
    let decoded = roundtrip(ALL_MARKET_SUMMARIES, output);
    let DynSolValue::Array(elements) = decoded else {
        panic!("expected array output");
    };

    let records = decode::assemble_all(&abi, ALL_MARKET_SUMMARIES, elements).unwrap();
    assert_eq!(records.len(), 2);

    let instant = StateInstant::new(112_033_711, 1_700_000_000);
    let summaries: Vec<MarketSummary> = records
        .iter()
        .map(|record| MarketSummary::from_record(instant, record).unwrap())
        .collect();

    // Names paired the values index-for-index through the nesting.
    assert_eq!(summaries[0].market(), eth);
    assert_eq!(summaries[0].asset(), "sETH");
    assert_eq!(summaries[0].key(), "sETHPERP");
    assert_eq!(summaries[0].price(), dec256!(2000));
    assert_eq!(summaries[0].market_skew(), dec256!(200));
    assert_eq!(summaries[0].taker_fee_offchain_delayed_order(), dec256!(0.001));
    assert_eq!(summaries[0].maker_fee_offchain_delayed_order(), dec256!(0.0002));
    assert_eq!(summaries[1].market(), btc);
    assert_eq!(summaries[1].market_skew(), dec256!(-10));

    let batch = MarketBatch::new(instant, summaries);
    assert_eq!(batch.instant(), instant);
    assert_eq!(batch.markets().len(), 2);

    // ETH: long = 600, short = -400; BTC: long = 45, short = -55.
    let eth_metrics = batch.markets()[0].metrics();
    assert_eq!(eth_metrics.long_oi(), dec256!(600));
    assert_eq!(eth_metrics.short_oi(), dec256!(-400));
    assert_eq!(eth_metrics.eight_hr_funding_rate(), dec256!(0.0012));
    assert_eq!(eth_metrics.yearly_funding_rate(), dec256!(131.4));
    assert_eq!(eth_metrics.relative_market_skew(), dec256!(0.2));

    let totals = batch.totals();
    assert_eq!(totals.total_market_size_usd(), dec256!(6000000));
    assert_eq!(totals.total_market_skew_usd(), D256::ZERO);

    // Shares over nonzero totals sum to one.
    let tolerance = dec256!(0.000000000000000000000000000001);
    let size_share_sum: D256 = batch
        .markets()
        .iter()
        .map(|snapshot| snapshot.shares().unwrap().proportional_market_size_usd())
        .sum();
    assert!((size_share_sum - dec256!(1)).abs() < tolerance);

    // An all-zero total saturates its shares.
    for snapshot in batch.markets() {
        assert_eq!(snapshot.shares().unwrap().proportional_market_skew_usd(), D256::ZERO);
    }
}

#[test]
fn skipping_a_drifted_record_keeps_the_batch() {
    let abi = abi::perps_v2_market_data().unwrap();
    let names = decode::extract_names(&abi, ALL_MARKET_SUMMARIES).unwrap();

    let good = summary_element(Address::repeat_byte(0x11), "sETH", "sETHPERP", 2000, 1000, 200);
    // One field short of the declared shape.
    let drifted = DynSolValue::Tuple(vec![
        DynSolValue::Address(Address::repeat_byte(0x33)),
        bytes32("sBAD"),
    ]);

    let instant = StateInstant::new(1, 0);
    let mut summaries = Vec::new();
    for element in [good, drifted] {
        let summary =
            decode::FlatRecord::from_parts(ALL_MARKET_SUMMARIES, &names, decode::flatten(element))
                .and_then(|record| MarketSummary::from_record(instant, &record));
        if let Ok(summary) = summary {
            summaries.push(summary);
        }
    }
    assert_eq!(summaries.len(), 1);

    let batch = MarketBatch::new(instant, summaries);
    assert_eq!(batch.markets().len(), 1);
    assert_eq!(
        batch.markets()[0].shares().unwrap().proportional_market_size_usd(),
        dec256!(1)
    );
}

#[test]
fn decodes_market_details_through_double_nesting() {
    let market = Address::repeat_byte(0x44);
    let output = DynSolValue::Tuple(vec![
        DynSolValue::Address(market),
        bytes32("sETH"),
        bytes32("sETHPERP"),
        fee_rates(),
        DynSolValue::Tuple(vec![uwad(25), uwad(10000)]),
        DynSolValue::Tuple(vec![uwad(9), uwad(100000)]),
        DynSolValue::Tuple(vec![
            uwad(1000),
            DynSolValue::Tuple(vec![uwad(600), uwad(400)]),
            uwad(50000),
            iwad(200),
        ]),
        DynSolValue::Tuple(vec![uwad(2000), DynSolValue::Bool(false)]),
    ]);

    let abi = abi::perps_v2_market_data().unwrap();
    let decoded = roundtrip(MARKET_DETAILS, output);
    let record = decode::assemble(&abi, MARKET_DETAILS, decoded).unwrap();
    assert_eq!(record.len(), 20);

    let instant = StateInstant::new(112_033_711, 1_700_000_000);
    let details = MarketDetails::from_record(instant, &record).unwrap();

    assert_eq!(details.market(), market);
    assert_eq!(details.base_asset(), "sETH");
    assert_eq!(details.market_key(), "sETHPERP");
    assert_eq!(details.taker_fee(), dec256!(0.003));
    assert_eq!(details.maker_fee(), dec256!(0.001));
    assert_eq!(details.max_leverage(), dec256!(25));
    assert_eq!(details.max_market_value(), dec256!(10000));
    assert_eq!(details.max_funding_velocity(), dec256!(9));
    assert_eq!(details.skew_scale(), dec256!(100000));
    assert_eq!(details.market_size(), dec256!(1000));
    // Doubly nested sides surfaced as flat leaves.
    assert_eq!(details.long(), dec256!(600));
    assert_eq!(details.short(), dec256!(400));
    assert_eq!(details.market_debt(), dec256!(50000));
    assert_eq!(details.market_skew(), dec256!(200));
    assert_eq!(details.price(), dec256!(2000));
    assert!(!details.invalid());

    assert_eq!(details.premium(), dec256!(0.002));
    assert_eq!(details.execution_price(), dec256!(2002));
    assert_eq!(details.price_impact_full_rebalance(), dec256!(0.001));
}

#[test]
fn snapshot_serializes_flat() {
    let eth = Address::repeat_byte(0x11);
    let output = DynSolValue::Array(vec![summary_element(eth, "sETH", "sETHPERP", 2000, 1000, 200)]);

    let abi = abi::perps_v2_market_data().unwrap();
    let DynSolValue::Array(elements) = roundtrip(ALL_MARKET_SUMMARIES, output) else {
        panic!("expected array output");
    };
    let records = decode::assemble_all(&abi, ALL_MARKET_SUMMARIES, elements).unwrap();
    let instant = StateInstant::new(112_033_711, 1_700_000_000);
    let summaries = vec![MarketSummary::from_record(instant, &records[0]).unwrap()];
    let batch = MarketBatch::new(instant, summaries);

    let json = serde_json::to_value(&batch.markets()[0]).unwrap();
    let object = json.as_object().unwrap();
    // Flat key-value pairs, no nested structures.
    assert!(object.values().all(|value| !value.is_object() && !value.is_array()));
    for key in [
        "block_number",
        "block_timestamp",
        "key",
        "price",
        "market_size",
        "long_oi",
        "short_oi",
        "relative_market_skew",
        "market_size_usd",
        "proportional_market_size_usd",
    ] {
        assert!(object.contains_key(key), "missing flat key `{key}`");
    }
}
