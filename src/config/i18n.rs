//! Internationalization (i18n) module for UI messages.

/// UI messages structure
#[derive(Debug, Clone)]
pub struct Messages {
    pub window_title: &'static str,
    pub instructions: &'static str,
    pub output: &'static str,
    pub screenshot: &'static str,
    pub monitoring_active: &'static str,
    pub select_area: &'static str,
    pub selection_canceled: &'static str,
    pub empty_selection: &'static str,
    pub capturing: &'static str,
    pub analyzing: &'static str,
    pub result: &'static str,
    pub analysis_error: &'static str,
    pub busy: &'static str,
    pub ready: &'static str,
    pub main: &'static str,
    pub settings: &'static str,
    pub logs: &'static str,
    pub save_settings: &'static str,
    pub reset_settings: &'static str,
    pub settings_saved: &'static str,
    pub clear_logs: &'static str,
    pub press_enter_to_capture: &'static str,
}

/// English messages
pub static MESSAGES_EN: Messages = Messages {
    window_title: "Screen Monitor Tool",
    instructions: "Press PgUp or use Screenshot button to ask a question",
    output: "Output:",
    screenshot: "Screenshot",
    monitoring_active: "Monitoring active. Press PgUp or click \"Screenshot\" to select an area and analyze the image content.",
    select_area: "Please select the screenshot area...",
    selection_canceled: "Screenshot selection canceled.",
    empty_selection: "Selected area is empty, drag to select a region.",
    capturing: "Taking screenshot and analyzing image content...",
    analyzing: "Analyzing the image, please wait...",
    result: "Result",
    analysis_error: "Image analysis error",
    busy: "Busy",
    ready: "Ready",
    main: "Main",
    settings: "Settings",
    logs: "Logs",
    save_settings: "Save",
    reset_settings: "Reset to defaults",
    settings_saved: "Settings saved",
    clear_logs: "Clear logs",
    press_enter_to_capture: "Press Enter to capture the screen, or type 'quit' to exit.",
};

/// Chinese messages
pub static MESSAGES_ZH: Messages = Messages {
    window_title: "屏幕监视工具",
    instructions: "按 PgUp 或点击截图按钮提问",
    output: "输出:",
    screenshot: "截图",
    monitoring_active: "监听中。按 PgUp 或点击“截图”选择区域并分析图片内容。",
    select_area: "请选择截图区域...",
    selection_canceled: "已取消截图选择。",
    empty_selection: "选择的区域为空，请拖动选择区域。",
    capturing: "正在截图并分析图片内容...",
    analyzing: "正在分析图片，请稍候...",
    result: "结果",
    analysis_error: "图片分析错误",
    busy: "处理中",
    ready: "就绪",
    main: "主页",
    settings: "设置",
    logs: "日志",
    save_settings: "保存",
    reset_settings: "重置默认",
    settings_saved: "设置已保存",
    clear_logs: "清空日志",
    press_enter_to_capture: "按回车截取屏幕，输入 'quit' 退出。",
};

/// Get UI messages by language.
///
/// # Arguments
/// * `lang` - Language code, "cn" for Chinese, anything else for English.
pub fn get_messages(lang: &str) -> &'static Messages {
    match lang {
        "cn" | "zh" => &MESSAGES_ZH,
        _ => &MESSAGES_EN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_messages() {
        let zh = get_messages("cn");
        assert_eq!(zh.screenshot, "截图");

        let en = get_messages("en");
        assert_eq!(en.screenshot, "Screenshot");
    }

    #[test]
    fn test_unknown_language_falls_back_to_english() {
        assert_eq!(get_messages("fr").window_title, "Screen Monitor Tool");
        assert_eq!(get_messages("zh").window_title, "屏幕监视工具");
    }
}
