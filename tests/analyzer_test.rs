//! Food analyzer tests
//!
//! Drives `FoodAnalyzer` against scripted endpoints: reply shapes, failure
//! categories, timeout and request contents.

use async_trait::async_trait;
use food_scanner::analyzer::{AnalysisRequest, AnalysisSettings, FoodAnalyzer, InferenceEndpoint};
use food_scanner::capture::{ImagePayload, ImageSource};
use food_scanner::error::{Result, ScannerError};
use food_scanner_common::{BalanceRating, SYSTEM_PROMPT, USER_PROMPT};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const BANANA_REPORT: &str = r#"{
  "alimentos": [
    {
      "nome": "banana",
      "quantidade_estimada": "1 unidade média",
      "calorias": 89,
      "proteinas": 1.1,
      "carboidratos": 22.8,
      "gorduras": 0.3,
      "fibras": 2.6,
      "vitaminas": ["B6", "C"],
      "minerais": ["Potássio"]
    }
  ],
  "analise_nutricional": {
    "total_calorias": 89,
    "total_proteinas": 1.1,
    "total_carboidratos": 22.8,
    "total_gorduras": 0.3,
    "equilibrio": "bom"
  },
  "beneficios_bebe": {
    "energia": ["Carboidratos de rápida absorção"],
    "digestao": ["Fibras solúveis"]
  },
  "recomendacoes": ["Oferecer amassada"],
  "alertas": []
}"#;

/// Replies with a fixed text and records every request
struct ScriptedEndpoint {
    reply: Result<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_request: Mutex<Option<AnalysisRequest>>,
}

impl ScriptedEndpoint {
    fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn failing(error: ScannerError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            delay: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn slow(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            delay: Some(delay),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceEndpoint for ScriptedEndpoint {
    async fn complete(&self, request: &AnalysisRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(ScannerError::Transport(msg)) => Err(ScannerError::Transport(msg.clone())),
            Err(other) => Err(ScannerError::AnalysisParse(other.to_string())),
        }
    }
}

fn payload() -> ImagePayload {
    ImagePayload {
        mime_type: "image/jpeg".into(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
        width: 640,
        height: 480,
        source: ImageSource::DataUrl,
        taken_at: None,
    }
}

fn analyzer(endpoint: Arc<ScriptedEndpoint>) -> FoodAnalyzer {
    FoodAnalyzer::new(endpoint, AnalysisSettings::default())
}

/// A plain JSON reply for a banana
#[tokio::test]
async fn test_banana_report() {
    let endpoint = ScriptedEndpoint::replying(BANANA_REPORT);
    let report = analyzer(endpoint.clone()).analyze(&payload()).await.unwrap();

    assert_eq!(report.items.len(), 1);
    assert_eq!(report.items[0].name, "banana");
    assert_eq!(report.items[0].calories, 89.0);
    assert_eq!(report.items[0].fiber_g, Some(2.6));
    assert_eq!(report.summary.total_calories, 89.0);
    assert_eq!(report.summary.balance, BalanceRating::Good);
    assert_eq!(report.summary.balance.color(), "blue");
    assert_eq!(report.recommendations, vec!["Oferecer amassada".to_string()]);
    assert!(report.alerts().is_empty());
    assert_eq!(endpoint.calls(), 1);
}

/// Fenced and unfenced replies produce the same report
#[tokio::test]
async fn test_fenced_reply_matches_plain_reply() {
    let plain = analyzer(ScriptedEndpoint::replying(BANANA_REPORT))
        .analyze(&payload())
        .await
        .unwrap();

    let fenced_text = format!("```json\n{}\n```", BANANA_REPORT);
    let fenced = analyzer(ScriptedEndpoint::replying(&fenced_text))
        .analyze(&payload())
        .await
        .unwrap();

    let bare_fence = format!("```\n{}\n```", BANANA_REPORT);
    let bare = analyzer(ScriptedEndpoint::replying(&bare_fence))
        .analyze(&payload())
        .await
        .unwrap();

    assert_eq!(plain, fenced);
    assert_eq!(plain, bare);
}

/// Prose instead of JSON is a parse failure, not a transport failure
#[tokio::test]
async fn test_non_json_reply() {
    let endpoint = ScriptedEndpoint::replying("not json");
    let err = analyzer(endpoint).analyze(&payload()).await.unwrap_err();

    assert!(matches!(err, ScannerError::AnalysisParse(_)));
    assert_eq!(err.category(), "analysis_parse");
    assert!(err.is_analysis_failure());
}

#[tokio::test]
async fn test_empty_reply_is_parse_failure() {
    let endpoint = ScriptedEndpoint::replying("");
    let err = analyzer(endpoint).analyze(&payload()).await.unwrap_err();
    assert!(matches!(err, ScannerError::AnalysisParse(_)));
}

/// A report missing required item fields is rejected
#[tokio::test]
async fn test_missing_required_field() {
    let endpoint = ScriptedEndpoint::replying(r#"{"alimentos": [{"nome": "arroz", "calorias": 130}]}"#);
    let err = analyzer(endpoint).analyze(&payload()).await.unwrap_err();
    assert!(matches!(err, ScannerError::AnalysisParse(_)));
}

/// No recognizable food is still a valid report
#[tokio::test]
async fn test_empty_food_list() {
    let endpoint = ScriptedEndpoint::replying(r#"{"alimentos": []}"#);
    let report = analyzer(endpoint).analyze(&payload()).await.unwrap();

    assert!(report.items.is_empty());
    assert_eq!(report.summary.total_calories, 0.0);
    assert!(!report.summary.balance.is_recognized());
    assert_eq!(report.summary.balance.color(), "gray");
}

/// Totals are passed through even when they disagree with the items
#[tokio::test]
async fn test_totals_are_not_recomputed() {
    let reply = BANANA_REPORT.replace("\"total_calorias\": 89", "\"total_calorias\": 300");
    let report = analyzer(ScriptedEndpoint::replying(&reply))
        .analyze(&payload())
        .await
        .unwrap();

    assert_eq!(report.summary.total_calories, 300.0);
    assert_eq!(report.item_totals().calories, 89.0);
    assert!(report.total_divergence() > 0.2);
}

#[tokio::test]
async fn test_transport_error_passes_through() {
    let endpoint = ScriptedEndpoint::failing(ScannerError::Transport("connection refused".into()));
    let err = analyzer(endpoint.clone()).analyze(&payload()).await.unwrap_err();

    assert!(matches!(err, ScannerError::Transport(_)));
    assert_eq!(err.category(), "transport");
    assert_eq!(endpoint.calls(), 1);
}

/// Slow endpoints are cut off at the configured timeout
#[tokio::test]
async fn test_timeout() {
    let endpoint = ScriptedEndpoint::slow(BANANA_REPORT, Duration::from_secs(5));
    let settings = AnalysisSettings {
        timeout: Duration::from_millis(50),
        ..AnalysisSettings::default()
    };
    let analyzer = FoodAnalyzer::new(endpoint, settings);

    let err = analyzer.analyze(&payload()).await.unwrap_err();
    assert!(matches!(err, ScannerError::AnalysisTimeout(d) if d == Duration::from_millis(50)));
    assert_eq!(err.category(), "analysis_timeout");
}

/// An empty image never reaches the endpoint
#[tokio::test]
async fn test_empty_payload_rejected() {
    let endpoint = ScriptedEndpoint::replying(BANANA_REPORT);
    let empty = ImagePayload {
        bytes: Vec::new(),
        ..payload()
    };

    let err = analyzer(endpoint.clone()).analyze(&empty).await.unwrap_err();
    assert!(matches!(err, ScannerError::UnreadableFile(_)));
    assert_eq!(endpoint.calls(), 0);
}

/// The request carries the fixed prompts, settings and the image as a data URL
#[tokio::test]
async fn test_request_contents() {
    let endpoint = ScriptedEndpoint::replying(BANANA_REPORT);
    let settings = AnalysisSettings {
        model: "gpt-4o-mini".into(),
        max_tokens: 1500,
        ..AnalysisSettings::default()
    };
    let image = payload();
    FoodAnalyzer::new(endpoint.clone(), settings)
        .analyze(&image)
        .await
        .unwrap();

    let request = endpoint.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(request.model, "gpt-4o-mini");
    assert_eq!(request.max_tokens, 1500);
    assert_eq!(request.system_prompt, SYSTEM_PROMPT);
    assert_eq!(request.user_prompt, USER_PROMPT);
    assert_eq!(request.image_url, image.to_data_url());
    assert!(request.image_url.starts_with("data:image/jpeg;base64,"));
}

/// Each analyze call is exactly one request, with no hidden retries
#[tokio::test]
async fn test_one_request_per_call() {
    let endpoint = ScriptedEndpoint::replying("not json");
    let analyzer = analyzer(endpoint.clone());

    let _ = analyzer.analyze(&payload()).await;
    let _ = analyzer.analyze(&payload()).await;
    assert_eq!(endpoint.calls(), 2);
}
