//! Ethereum explorer client against a mock Etherscan-style API.

use chain_analytics::config::EthereumConfig;
use chain_analytics::explorer::{AddressBalance, BlockLookup, ExplorerError, TransactionLookup};

mod common;

use common::{MockExplorer, Route};

const ADDRESS: &str = "0xde0b295669a9fd93d5f28d9ec85e40f4cb697bae";
const TX_HASH: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

#[tokio::test]
async fn test_balance_request_shape() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=balance",
        r#"{"status":"1","message":"OK","result":"1000000000000000000"}"#,
    )])
    .await;

    let balance = mock.ethereum().balance(ADDRESS).await.unwrap();
    assert_eq!(balance.display_amount(), "1.000000 ETH");

    assert_eq!(
        mock.requests(),
        vec![format!(
            "/api?module=account&action=balance&address={ADDRESS}&tag=latest&apikey=TESTKEY"
        )]
    );
}

#[tokio::test]
async fn test_zero_balance_is_literal() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=balance",
        r#"{"status":"1","message":"OK","result":"0"}"#,
    )])
    .await;

    let balance = mock.ethereum().balance(ADDRESS).await.unwrap();
    assert_eq!(balance.display_amount(), "0 ETH");
}

#[tokio::test]
async fn test_large_balance_is_exact() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=balance",
        r#"{"status":"1","message":"OK","result":"3000123456789000000000000"}"#,
    )])
    .await;

    let balance = mock.ethereum().balance(ADDRESS).await.unwrap();
    assert_eq!(balance.display_amount(), "3000123.456789 ETH");
}

#[tokio::test]
async fn test_status_not_one_surfaces_message() {
    let bodies = [
        r#"{"status":"0","message":"NOTOK","result":"Max rate limit reached"}"#,
        r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#,
        r#"{"status":"2","message":"NOTOK","result":""}"#,
    ];

    for body in bodies {
        let mock = MockExplorer::start(vec![Route::ok("module=", body)]).await;
        let explorer = mock.ethereum();

        let err = explorer.balance(ADDRESS).await.unwrap_err();
        assert!(matches!(&err, ExplorerError::Upstream(m) if m.contains("NOTOK")), "{err}");

        let err = explorer.block("17000000").await.unwrap_err();
        assert!(matches!(&err, ExplorerError::Upstream(m) if m.contains("NOTOK")), "{err}");
    }
}

#[tokio::test]
async fn test_unparseable_wei_is_error() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=balance",
        r#"{"status":"1","message":"OK","result":"12abc"}"#,
    )])
    .await;

    let err = mock.ethereum().balance(ADDRESS).await.unwrap_err();
    assert!(matches!(err, ExplorerError::InvalidAmount(_)), "{err}");
}

#[tokio::test]
async fn test_transaction_fields_render_verbatim() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=eth_getTransactionByHash",
        format!(
            r#"{{"jsonrpc":"2.0","id":1,"result":{{
                "blockHash":"0xf850331061196b8f2b67e1f43aaa9e69504c059d3d3fb9547b04f9ed4d141ab7",
                "blockNumber":"0xcf2420",
                "from":"0x00192fb10df37c9fb26829eb2cc623cd1bf599e8",
                "gas":"0x5208",
                "gasPrice":"0x19f017ef49",
                "gasUsed":"0x5208",
                "hash":"{TX_HASH}",
                "input":"0x",
                "nonce":"0x1",
                "to":"0xc67f4e626ee4d3f272c2fb31bad60761ab55ed9f",
                "value":"0x4c6b2e2e1f2c0000",
                "confirmations":"1024"
            }}}}"#
        ),
    )])
    .await;

    let tx = mock.ethereum().transaction(TX_HASH).await.unwrap();
    assert_eq!(
        tx.to_string(),
        format!(
            "Transaction:\n  Hash: {TX_HASH}\n  \
             From: 0x00192fb10df37c9fb26829eb2cc623cd1bf599e8\n  \
             To: 0xc67f4e626ee4d3f272c2fb31bad60761ab55ed9f\n  \
             Value: 0x4c6b2e2e1f2c0000 wei\n  \
             Gas: 0x5208\n  \
             Gas Price: 0x19f017ef49\n  \
             Gas Used: 0x5208\n  \
             Confirmations: 1024\n"
        )
    );

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains(&format!("txhash={TX_HASH}")));
    assert!(requests[0].contains("module=proxy"));
}

#[tokio::test]
async fn test_null_transaction_is_not_found() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=eth_getTransactionByHash",
        r#"{"jsonrpc":"2.0","id":1,"result":null}"#,
    )])
    .await;

    let err = mock.ethereum().transaction(TX_HASH).await.unwrap_err();
    assert!(matches!(err, ExplorerError::NotFound("transaction")), "{err}");
    assert_eq!(err.to_string(), "transaction not found");
}

#[tokio::test]
async fn test_rpc_error_is_upstream() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=eth_getTransactionByHash",
        r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32602,"message":"invalid argument 0: hex string has length 4, want 64 for common.Hash"}}"#,
    )])
    .await;

    let err = mock.ethereum().transaction("0xab").await.unwrap_err();
    match err {
        ExplorerError::Upstream(message) => {
            assert!(message.contains("invalid argument 0"));
            assert!(message.contains("-32602"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_string_result_on_proxy_is_upstream() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=eth_getTransactionByHash",
        r#"{"status":"0","message":"NOTOK","result":"Invalid API Key"}"#,
    )])
    .await;

    let err = mock.ethereum().transaction(TX_HASH).await.unwrap_err();
    assert_eq!(err.to_string(), "explorer error: NOTOK: Invalid API Key");
}

#[tokio::test]
async fn test_block_accepts_list_and_object_results() {
    let list = r#"{"status":"1","message":"OK","result":[
        {"blockNumber":"2165403","blockMiner":"0x13a06d3dfe21e0db5c016c03ea7d2509f7f8d1e3","blockReward":"5314181600000000000","transactionCount":"7"},
        {"blockNumber":"0","blockMiner":"ignored","blockReward":"0"}
    ]}"#;
    let object = r#"{"status":"1","message":"OK","result":
        {"blockNumber":"2165403","timeStamp":"1472533979","blockMiner":"0x13a06d3dfe21e0db5c016c03ea7d2509f7f8d1e3","blockReward":"5314181600000000000","uncleInclusionReward":"312500000000000000"}
    }"#;

    let mock = MockExplorer::start(vec![Route::ok("action=getblockreward", list)]).await;
    let block = mock.ethereum().block("2165403").await.unwrap();
    assert_eq!(block.block_number, "2165403");
    assert_eq!(block.transaction_count.as_deref(), Some("7"));
    assert_eq!(
        block.to_string(),
        "Block:\n  Block Number: 2165403\n  \
         Miner: 0x13a06d3dfe21e0db5c016c03ea7d2509f7f8d1e3\n  \
         Block Reward: 5314181600000000000\n  \
         Transaction Count: 7\n"
    );
    assert!(mock.requests()[0].contains("blockno=2165403"));

    let mock = MockExplorer::start(vec![Route::ok("action=getblockreward", object)]).await;
    let block = mock.ethereum().block("2165403").await.unwrap();
    assert_eq!(block.block_reward, "5314181600000000000");
    assert_eq!(block.time_stamp.as_deref(), Some("1472533979"));
}

#[tokio::test]
async fn test_empty_block_result_is_not_found() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=getblockreward",
        r#"{"status":"1","message":"OK","result":[]}"#,
    )])
    .await;

    let err = mock.ethereum().block("1").await.unwrap_err();
    assert!(matches!(err, ExplorerError::NotFound("block")), "{err}");
}

#[tokio::test]
async fn test_chain_id_is_sent_when_configured() {
    let mock = MockExplorer::start(vec![Route::ok(
        "action=balance",
        r#"{"status":"1","message":"OK","result":"0"}"#,
    )])
    .await;
    let explorer = mock.ethereum_with(EthereumConfig {
        chain_id: Some(1),
        ..EthereumConfig::default()
    });

    explorer.balance(ADDRESS).await.unwrap();
    let requests = mock.requests();
    assert!(requests[0].contains("&chainid=1&apikey=TESTKEY"), "{}", requests[0]);
}
