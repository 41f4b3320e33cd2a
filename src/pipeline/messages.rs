// file: src/pipeline/messages.rs
// description: user-facing texts for greetings, placeholders and failure classes
// reference: every failure ends as one readable assistant message

use crate::error::{PipelineError, ProviderKind};
use crate::utils::Validator;

pub const GREETING: &str = "你好。我是 FinanceInsight AI。我已经完成了对知识库文件的解析。我可以为你提取投资论点、识别风险因素或进行特定的股票分析。请问你想了解什么？";

pub const MISSING_PRIMARY_KEY: &str = "请先在设置中配置您的 Google Gemini API Key（环境变量 GEMINI_API_KEY，或使用 --api-key 参数）。";
pub const INVALID_PRIMARY_KEY: &str = "API Key 无效或已过期，请在设置中检查您的密钥。";
pub const SERVICE_UNAVAILABLE: &str = "系统错误: AI 服务暂时不可用，请检查网络连接或 API 配额。";
pub const DEEP_ANALYSIS_FAILED: &str = "深度分析失败: 第一阶段信息提取未能完成，已终止本次分析。";

pub const EMPTY_EXTRACTION: &str = "未生成任何输出 (No output produced).";
pub const EMPTY_ANSWER: &str = "No analysis could be generated.";
pub const EMPTY_CRITIQUE: &str = "推理阶段未生成任何输出 (No critique produced).";

/// Longest provider error body quoted back to the user.
pub const FALLBACK_DETAIL_MAX_CHARS: usize = 300;

pub const REASONING_FALLBACK_HEADER: &str = "【系统错误】推理服务调用失败，已降级 (system error, falling back)";

/// Maps any pipeline error to the single message shown to the user.
pub fn user_facing_message(err: &PipelineError) -> String {
    match err {
        PipelineError::MissingCredential(ProviderKind::Primary) => MISSING_PRIMARY_KEY.to_string(),
        PipelineError::InvalidCredential {
            provider: ProviderKind::Primary,
            ..
        } => INVALID_PRIMARY_KEY.to_string(),
        _ => SERVICE_UNAVAILABLE.to_string(),
    }
}

/// Deep-mode failure text: the analysis header plus the failure class.
pub fn deep_failure_message(err: &PipelineError) -> String {
    format!("{}\n\n{}", DEEP_ANALYSIS_FAILED, user_facing_message(err))
}

/// In-band block describing a degraded reasoning call.
pub fn reasoning_fallback_message(err: &PipelineError) -> String {
    let detail = match err {
        PipelineError::Provider {
            status, message, ..
        } => format!("HTTP {}: {}", status, quoted_detail(message)),
        PipelineError::InvalidCredential { message, .. } => {
            format!("密钥被拒绝: {}", quoted_detail(message))
        }
        PipelineError::Transport { .. } => "网络请求失败，无法连接推理服务".to_string(),
        other => Validator::truncate_text(&other.to_string(), FALLBACK_DETAIL_MAX_CHARS),
    };

    format!(
        "{}\n\n> {}\n\n第一阶段的信息提取结果已保留，请稍后重试推理阶段或检查推理服务配置。",
        REASONING_FALLBACK_HEADER, detail
    )
}

fn quoted_detail(body: &str) -> String {
    let flattened = body.split_whitespace().collect::<Vec<_>>().join(" ");
    Validator::truncate_text(&flattened, FALLBACK_DETAIL_MAX_CHARS)
}
