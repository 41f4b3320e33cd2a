// file: src/knowledge/samples.rs
// description: built-in sample corpus so the assistant works without a documents directory
// reference: mock retrieval material (transcripts produced by upstream ingestion)

use crate::models::{DocumentCategory, KnowledgeDocument};
use chrono::NaiveDate;

pub const BABA_TRANSCRIPT_ID: &str = "baba-fy2024-q3";
pub const NVDA_INTERVIEW_ID: &str = "nvda-analysis-video";
pub const MACRO_REPORT_ID: &str = "macro-strategy-2024";

/// Instruction used by the `demo` command against the BABA transcript.
pub const DEMO_INSTRUCTION: &str =
    "基于提供的会议纪要，生成一份投资分析备忘录。包含核心观点、风险和估值看法。";

const BABA_TRANSCRIPT: &str = "\
[00:12:30] CEO: 感谢大家参加 BABA 第三季度财报会议。本季度我们面临复杂的宏观环境。
[00:12:45] CFO: 财务数据方面，本季度营收同比增长 5%，达到 2603 亿元人民币。调整后 EBITDA 同比下降 2%，主要由于我们在 Taobao 和 Tmall 上的高投入用户留存策略。
[00:13:10] CEO: 云智能集团（Cloud Intelligence Group）收入增长放缓至 3%，我们正在主动削减低利润率的项目制合同，转向公共云服务。
[00:14:00] Analyst (Goldman Sachs): 关于资本配置，你们宣布了新的回购计划？
[00:14:15] CFO: 是的，我们将股票回购计划规模扩大 250 亿美元。我们认为目前股价被严重低估（Undervalued），PE 倍数处于历史低位。
[00:15:00] Risk Officer: 监管层面，我们注意到反垄断整改已基本完成，但地缘政治对芯片供应链的影响仍在持续。";

const NVDA_INTERVIEW: &str = "\
[00:02:10] 主持人: 今天我们请到两位半导体行业专家，聊聊 NVDA 的数据中心业务。
[00:02:40] 专家A: 数据中心收入已经占到总营收的八成以上，H100 的交付周期从 40 周缩短到 12 周左右，说明供给瓶颈在缓解。
[00:03:30] 专家B: 但要注意，交付周期缩短也可能意味着需求边际放缓，大客户的资本开支指引是关键观察点。
[00:04:15] 专家A: 技术面上，股价在 50 日均线附近获得支撑，MACD 仍在零轴上方，趋势没有破坏。
[00:05:00] 专家B: 估值方面，前瞻 PE 大约 35 倍，相对增速不算贵，但一旦增速回落，估值压缩会很快。
[00:05:45] 主持人: 北向资金和机构席位最近有什么动作？
[00:06:05] 专家A: 光模块和服务器产业链的机构持仓在继续提升，资金明显在沿着算力链扩散。";

const MACRO_REPORT: &str = "\
# 2024 年宏观策略展望

## 核心观点
美联储降息周期预计于下半年开启，全年降息幅度 50-75bp；国内货币政策保持宽松，社融增速企稳。

## 通胀与利率
美国核心 PCE 回落至 2.6%，但服务通胀粘性较强。十年期美债收益率中枢预计在 4.0%-4.5% 区间波动。

## 行业轮动
- 复苏期：消费电子、半导体设备
- 过热风险：AI 算力链部分标的估值已透支未来两年业绩
- 防御配置：高股息公用事业、运营商

## 风险提示
地缘政治冲突、海外衰退超预期、国内地产链修复不及预期。";

/// Sample documents in display order (newest ingestion first).
pub fn sample_documents() -> Vec<KnowledgeDocument> {
    vec![
        KnowledgeDocument::new(
            MACRO_REPORT_ID,
            "2024_Macro_Strategy_Report.pdf",
            DocumentCategory::Pdf,
            date(2024, 12, 2),
            "券商年度宏观策略：降息周期、通胀粘性与行业轮动",
            MACRO_REPORT,
        ),
        KnowledgeDocument::new(
            NVDA_INTERVIEW_ID,
            "NVDA_Analysis_Video.mp4",
            DocumentCategory::Video,
            date(2024, 11, 28),
            "行业专家访谈字幕：数据中心需求、交付周期与估值",
            NVDA_INTERVIEW,
        ),
        KnowledgeDocument::new(
            BABA_TRANSCRIPT_ID,
            "BABA_FY2024_Q3_Transcript.pdf",
            DocumentCategory::Pdf,
            date(2024, 11, 15),
            "阿里巴巴 FY2024 Q3 财报电话会议纪要（OCR）",
            BABA_TRANSCRIPT,
        ),
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}
