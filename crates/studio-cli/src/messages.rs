//! User-facing strings in each supported locale.

use studio_core::types::{Locale, Scope};

/// Text shown by the command line frontend.
#[derive(Debug, Clone, Copy)]
pub struct Messages {
    locale: Locale,
    pub target_global: &'static str,
    pub target_repo_prefix: &'static str,
    pub overwrite_confirm: &'static str,
    pub default_value_applied: &'static str,
    pub loaded: &'static str,
    pub saved: &'static str,
    pub kept: &'static str,
    pub placeholder_notice: &'static str,
    pub not_set: &'static str,
    pub empty: &'static str,
    pub overridden_by: &'static str,
    pub effective_value: &'static str,
    pub conflict: &'static str,
    pub no_entries: &'static str,
    pub other_keys: &'static str,
    pub flagged: &'static str,
    pub language: &'static str,
    pub suggestions: &'static str,
    pub value_prompt: &'static str,
}

const EN: Messages = Messages {
    locale: Locale::En,
    target_global: "Global config",
    target_repo_prefix: "Repository:",
    overwrite_confirm: "This key already exists in this scope. Overwrite?",
    default_value_applied: "Default value applied",
    loaded: "Loaded current scope",
    saved: "Saved to current scope",
    kept: "Kept the existing value",
    placeholder_notice: "Backend unavailable, showing placeholder values",
    not_set: "<not set>",
    empty: "<empty>",
    overridden_by: "overridden by",
    effective_value: "Effective value",
    conflict: "Conflict detected",
    no_entries: "No entries",
    other_keys: "Other",
    flagged: "Ignored malformed entries",
    language: "Language",
    suggestions: "Known keys",
    value_prompt: "Value",
};

const ZH: Messages = Messages {
    locale: Locale::Zh,
    target_global: "全局配置",
    target_repo_prefix: "仓库：",
    overwrite_confirm: "该配置已存在，是否覆盖？",
    default_value_applied: "已使用该键的默认值",
    loaded: "已加载当前作用域配置",
    saved: "已保存到当前作用域",
    kept: "已保留原有值",
    placeholder_notice: "后端不可用，显示占位数据",
    not_set: "<未设置>",
    empty: "<空>",
    overridden_by: "被覆盖来源",
    effective_value: "生效值",
    conflict: "存在冲突",
    no_entries: "暂无配置",
    other_keys: "其他",
    flagged: "已忽略格式错误的条目",
    language: "语言",
    suggestions: "已知配置键",
    value_prompt: "值",
};

impl Messages {
    pub fn for_locale(locale: Locale) -> Messages {
        match locale {
            Locale::En => EN,
            Locale::Zh => ZH,
        }
    }

    pub fn scope_name(&self, scope: Scope) -> &'static str {
        match (self.locale, scope) {
            (Locale::En, _) => scope.label(),
            (Locale::Zh, Scope::Local) => "本地",
            (Locale::Zh, Scope::Global) => "全局",
            (Locale::Zh, Scope::System) => "系统",
            (Locale::Zh, Scope::Merged) => "合并",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_names_follow_locale() {
        assert_eq!(Messages::for_locale(Locale::En).scope_name(Scope::Merged), "Merged");
        assert_eq!(Messages::for_locale(Locale::Zh).scope_name(Scope::Local), "本地");
    }
}
