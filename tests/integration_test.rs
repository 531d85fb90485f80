use case_search_submit::models::{
    load_all_lookup_requests, load_lookup_request, CaseType, Court, SearchParameters,
};
use case_search_submit::services::HistoryService;
use case_search_submit::workflow::{FlowState, LookupFlow, SubmissionOutcome};
use case_search_submit::{Config, CourtGateway, HttpExecutor};

#[tokio::test]
#[ignore] // 默认忽略，需要后端在跑：cargo test -- --ignored
async fn test_issue_challenge_against_live_backend() {
    // 加载配置
    let config = Config::from_env();

    let executor = HttpExecutor::new(&config).expect("创建 HttpExecutor 失败");
    let flow = LookupFlow::new(CourtGateway::new(executor));

    let session = flow.begin_challenge().await.expect("获取验证码失败");
    println!(
        "验证码挑战: {} (session={})",
        session.text, session.session_id
    );

    assert!(!session.text.is_empty());
    assert_eq!(flow.state(), FlowState::AwaitingSolution);
}

#[tokio::test]
#[ignore]
async fn test_full_lookup_against_live_backend() {
    // 加载配置
    let config = Config::from_env();

    let executor = HttpExecutor::new(&config).expect("创建 HttpExecutor 失败");
    let flow = LookupFlow::new(CourtGateway::new(executor));

    let session = flow.begin_challenge().await.expect("获取验证码失败");

    // 演示后端把挑战文本原样放进响应，照抄即可通过
    let params = SearchParameters {
        case_type: CaseType::Writ,
        case_number: "WP-2024-100".to_string(),
        filing_year: 2024,
        court: Court::HighCourt,
    };
    let outcome = flow
        .submit(params, &session.text)
        .await
        .expect("提交验证码失败");

    match outcome {
        SubmissionOutcome::Success { query_id } => {
            println!("检索已受理: queryId={}", query_id);
        }
        other => panic!("意外的结果: {:?}", other),
    }
}

#[tokio::test]
#[ignore]
async fn test_fetch_history_against_live_backend() {
    // 加载配置
    let config = Config::from_env();

    let executor = HttpExecutor::new(&config).expect("创建 HttpExecutor 失败");
    let history = HistoryService::new(&config);

    let records = history.fetch(&executor).await.expect("拉取历史失败");
    println!("找到 {} 条历史记录", records.len());
}

#[test]
fn test_load_lookup_request_from_file() {
    tokio_test::block_on(async {
        let dir = std::env::temp_dir().join(format!("case_search_submit_it_{}", std::process::id()));
        tokio::fs::create_dir_all(&dir)
            .await
            .expect("创建临时目录失败");

        let file = dir.join("sample_lookup.toml");
        tokio::fs::write(
            &file,
            r#"
case_type = "writ"
case_number = "WP-2024-100"
filing_year = 2024
court = "high-court"
"#,
        )
        .await
        .expect("写入临时文件失败");

        let request = load_lookup_request(&file).await.expect("加载请求失败");
        assert_eq!(request.case_number, "WP-2024-100");
        assert_eq!(request.case_type, CaseType::Writ);
        assert!(request.file_path.is_some());

        // 坏文件和非 toml 文件都应被扫描跳过
        tokio::fs::write(dir.join("broken.toml"), "case_type = [not closed")
            .await
            .expect("写入坏文件失败");
        tokio::fs::write(dir.join("notes.txt"), "ignore me")
            .await
            .expect("写入无关文件失败");

        let all = load_all_lookup_requests(dir.to_str().expect("临时路径非法"))
            .await
            .expect("扫描目录失败");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].case_number, "WP-2024-100");

        tokio::fs::remove_dir_all(&dir).await.ok();
    });
}
