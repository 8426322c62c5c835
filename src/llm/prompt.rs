// file: src/llm/prompt.rs
// description: qa extraction prompt template and request message construction
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::llm::backend::ChatMessage;

/// Traditional-Chinese extraction instructions. The wording is a fixed asset;
/// `{pair_count}`, `{source_id}` and `{text}` are substituted in one pass.
pub const PROMPT_TEMPLATE: &str = r#"
你是一個專業的問答提取助手。你的任務是從提供的文本中，精確地提取出{pair_count}個問答對。
**所有提取的資訊，包括問題、思考過程和答案，都必須嚴格地基於提供的「文本」內容，不得引入任何外部知識或臆測。**
每個問答對必須包含以下三個鍵：'question', 'thought', 'answer'。

**提取規則：**
1.  **Question (問題):** 根據提供的「文本」內容，提出一個清晰、簡潔的問題。這個問題應該是使用者可能會提出的，並且其答案可以直接從文本中找到或推斷。**請注意，問題中不得提及檔案名稱或任何與來源文件相關的資訊。**
2.  **Thought (思考過程):** 詳細描述你是如何從「文本」中推導出答案的。這包括：
    *   你識別的關鍵詞或短語。
    *   文本中支持答案的具體句子或段落。
    *   你的邏輯推理過程，例如如何處理歧義、如何綜合多個信息點來形成答案。
    *   如果文本中沒有直接答案，請說明你是如何判斷的。
    *   **當提及文本中的特定文件或來源時，請務必輸出不含副檔名的完整檔案名稱，例如：`在{source_id}的「電氣安全注意事項」部分...`，以確保資訊的可追溯性。**
3.  **Answer (答案):** 提供問題的直接答案。答案必須完全基於提供的「文本」內容，**嚴禁引入外部知識**。如果文本中沒有足夠的信息來回答問題，請明確表示「文本中沒有足夠的資訊來回答此問題。」
    *   **當提及文本中的特定文件或來源時，請務必輸出不含副檔名的完整檔案名稱，例如：`在{source_id}的「電氣安全注意事項」部分...`，以確保資訊的可追溯性。**

**輸出格式：**
請以一個 JSON 陣列的形式返回結果，每個元素是一個問答對物件。
請確保 JSON 格式嚴格正確，並且所有鍵值對都符合上述定義。

**範例輸出格式:**
[
    {
        "question": "機台的電氣連接應由誰執行？",
        "thought": "我在{source_id}的「電氣安全注意事項」部分找到了關鍵詞「電氣連接」和「執行」。具體句子是「電氣連接應由專業電工執行。」這句話直接回答了問題，因此我將其作為答案，並將找到的關鍵信息作為思考過程。",
        "answer": "在{source_id}中提到，電氣連接應由專業電工執行。"
    },
    {
        "question": "操作介質液時需要佩戴哪些防護設備？",
        "thought": "我在{source_id}中搜索「介質液」和「防護設備」。在「介質液安全注意事項」部分，我發現了「操作介質液時，請佩戴防護手套、安全眼鏡等個人防護設備。」這句話。這句話明確列出了所需的防護設備，因此我將其作為答案，並將搜索過程和找到的具體內容作為思考過程。",
        "answer": "在{source_id}中提到，操作介質液時，請佩戴防護手套、安全眼鏡等個人防護設備。"
    },
    {
        "question": "這份文件中是否提到了機台的保固期限？",
        "thought": "我仔細閱讀了{source_id}，特別是關於「保固」、「期限」、「售後服務」等相關詞彙。在文本中沒有找到任何關於機台具體保固期限的明確說明或章節。因此，判斷文本中沒有足夠的資訊來回答此問題。",
        "answer": "文本中沒有足夠的資訊來回答此問題。"
    }
]

**文本：**
---
{text}
---
"#;

const TEXT_PLACEHOLDER: &str = "{text}";

/// Answer the model must give when the text cannot support one.
pub const INSUFFICIENT_INFORMATION: &str = "文本中沒有足夠的資訊來回答此問題";

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            template: PROMPT_TEMPLATE.to_string(),
        }
    }

    /// Renders the instructions. `text` is inserted verbatim after the other
    /// placeholders are resolved, so braces inside document text are never
    /// treated as placeholders.
    pub fn render(&self, text: &str, source_id: &str, requested: Option<usize>) -> String {
        let pair_count = requested.map(|n| n.to_string()).unwrap_or_default();

        let (before, after) = match self.template.split_once(TEXT_PLACEHOLDER) {
            Some((before, after)) => (before, Some(after)),
            None => (self.template.as_str(), None),
        };

        let fill = |part: &str| {
            part.replace("{pair_count}", &pair_count)
                .replace("{source_id}", source_id)
        };

        let mut prompt = fill(before);
        if let Some(after) = after {
            prompt.push_str(text);
            prompt.push_str(&fill(after));
        }
        prompt
    }

    pub fn build(&self, text: &str, source_id: &str, requested: Option<usize>) -> Vec<ChatMessage> {
        vec![ChatMessage::user(self.render(text, source_id, requested))]
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_count_is_demanded() {
        let prompt = PromptBuilder::new().render("body", "manual", Some(5));
        assert!(prompt.contains("精確地提取出5個問答對"));
    }

    #[test]
    fn test_unconstrained_count() {
        let prompt = PromptBuilder::new().render("body", "manual", None);
        assert!(prompt.contains("精確地提取出個問答對"));
        assert!(!prompt.contains("{pair_count}"));
    }

    #[test]
    fn test_source_identifier_and_contract_keys() {
        let prompt = PromptBuilder::new().render("body", "安全手冊", None);

        assert!(prompt.contains("在安全手冊的「電氣安全注意事項」部分"));
        assert!(!prompt.contains("{source_id}"));
        assert!(prompt.contains("'question', 'thought', 'answer'"));
        assert!(prompt.contains(INSUFFICIENT_INFORMATION));
        assert!(prompt.contains("JSON 陣列"));
        assert!(prompt.contains("不得引入任何外部知識"));
    }

    #[test]
    fn test_text_inserted_verbatim_at_the_end() {
        let text = "price is {pair_count} and {source_id}";
        let prompt = PromptBuilder::new().render(text, "doc", Some(2));
        assert!(prompt.ends_with(&format!("**文本：**\n---\n{}\n---\n", text)));
    }

    #[test]
    fn test_template_is_unchanged_asset() {
        assert!(PROMPT_TEMPLATE.starts_with("\n你是一個專業的問答提取助手。"));
        assert_eq!(PROMPT_TEMPLATE.matches(TEXT_PLACEHOLDER).count(), 1);
        assert!(!PROMPT_TEMPLATE.contains("{{"));
    }

    #[test]
    fn test_build_produces_single_user_message() {
        let messages = PromptBuilder::new().build("body", "doc", None);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert!(messages[0].content.contains("body"));
    }
}
