// SPDX-License-Identifier: MIT

//! Localized UI strings for the CLI

use crate::gateway::Language;

/// The full set of player-facing strings, one table per language.
#[derive(Debug)]
pub struct UiText {
    pub title: &'static str,
    pub choose_topic: &'static str,
    pub invalid_topic: &'static str,
    pub generating: &'static str,
    pub commands_help: &'static str,
    pub guess_prompt: &'static str,
    pub correct: &'static str,
    pub wrong: &'static str,
    pub hint_label: &'static str,
    pub answer_was: &'static str,
    pub generation_failed: &'static str,
    pub stats_title: &'static str,
    pub total_games: &'static str,
    pub win_rate: &'static str,
    pub best_streak: &'static str,
    pub total_score: &'static str,
    pub goodbye: &'static str,
}

static EN: UiText = UiText {
    title: "Emoji Oracle",
    choose_topic: "Choose a topic:",
    invalid_topic: "Pick a number from the list or type a topic name.",
    generating: "Summoning a new puzzle...",
    commands_help: "(type a guess, or: hint / skip / quit)",
    guess_prompt: "Your guess",
    correct: "Correct!",
    wrong: "Not quite, try again.",
    hint_label: "Hint",
    answer_was: "The answer was",
    generation_failed: "Puzzle generation failed",
    stats_title: "Your Stats",
    total_games: "Games played",
    win_rate: "Win rate",
    best_streak: "Best streak",
    total_score: "Total score",
    goodbye: "See you next time!",
};

static ZH_CN: UiText = UiText {
    title: "Emoji 神谕",
    choose_topic: "选择一个主题：",
    invalid_topic: "请输入列表中的数字或主题名称。",
    generating: "正在召唤新谜题...",
    commands_help: "（输入你的猜测，或：hint / skip / quit）",
    guess_prompt: "你的猜测",
    correct: "答对了！",
    wrong: "不对，再试一次。",
    hint_label: "提示",
    answer_was: "答案是",
    generation_failed: "谜题生成失败",
    stats_title: "游戏战绩",
    total_games: "总场次",
    win_rate: "胜率",
    best_streak: "最佳连胜",
    total_score: "总分",
    goodbye: "下次见！",
};

impl UiText {
    pub fn for_language(language: Language) -> &'static UiText {
        match language {
            Language::En => &EN,
            Language::ZhCn => &ZH_CN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_differ_per_language() {
        let en = UiText::for_language(Language::En);
        let zh = UiText::for_language(Language::ZhCn);
        assert_eq!(en.stats_title, "Your Stats");
        assert_ne!(en.correct, zh.correct);
    }
}
