//! GM API polyfill injection
//!
//! Only the APIs a script actually grants get a shim. Every shim checks for
//! an existing implementation first, so a host that already provides the API
//! keeps its own.

use crate::models::UserScriptMetadata;
use crate::report::Reporter;

pub const POLYFILL_HEADER: &str = "// ===== GM API Polyfill for Browser Extensions =====";
pub const WRAPPER_OPEN: &str = "(function() {";
pub const WRAPPER_STRICT: &str = "    \"use strict\";";
pub const WRAPPER_CLOSE: &str = "})();";

const ADD_STYLE: &str = r#"function(css) {
            const style = document.createElement('style');
            style.textContent = css;
            (document.head || document.documentElement).appendChild(style);
            return style;
        }"#;

const SET_VALUE: &str = r#"function(key, value) {
            return new Promise((resolve) => {
                chrome.storage.local.set({ [key]: value }, () => resolve());
            });
        }"#;

const GET_VALUE: &str = r#"function(key, defaultValue) {
            return new Promise((resolve) => {
                chrome.storage.local.get([key], (result) => {
                    resolve(key in result ? result[key] : defaultValue);
                });
            });
        }"#;

const DELETE_VALUE: &str = r#"function(key) {
            return new Promise((resolve) => {
                chrome.storage.local.remove([key], () => resolve());
            });
        }"#;

const LIST_VALUES: &str = r#"function() {
            return new Promise((resolve) => {
                chrome.storage.local.get(null, (items) => resolve(Object.keys(items)));
            });
        }"#;

const XML_HTTP_REQUEST: &str = r#"function(details) {
            fetch(details.url, {
                method: details.method || 'GET',
                headers: details.headers || {},
                body: details.data
            }).then((response) => response.text().then((text) => {
                if (details.onload) {
                    details.onload({
                        status: response.status,
                        statusText: response.statusText,
                        responseText: text,
                        response: text,
                        finalUrl: response.url
                    });
                }
            })).catch((error) => {
                if (details.onerror) {
                    details.onerror(error);
                }
            });
        }"#;

const NOTIFICATION: &str = r#"function(options) {
            chrome.notifications.create({
                type: 'basic',
                iconUrl: options.image || '',
                title: options.title || '',
                message: options.text || ''
            });
        }"#;

const SET_CLIPBOARD: &str = r#"function(text) {
            const textarea = document.createElement('textarea');
            textarea.value = text;
            document.body.appendChild(textarea);
            textarea.select();
            document.execCommand('copy');
            document.body.removeChild(textarea);
        }"#;

const OPEN_IN_TAB: &str = r#"function(url, options) {
            const background = options === true || (options && options.active === false);
            chrome.tabs.create({ url: url, active: !background });
        }"#;

const DOWNLOAD: &str = r#"function(details) {
            chrome.downloads.download({
                url: details.url,
                filename: details.name,
                saveAs: details.saveAs || false
            }, details.onload || (() => {}));
        }"#;

/// Function bodies keyed by the exact grant identifier
static GM_API_SHIMS: &[(&str, &str)] = &[
    ("GM_addStyle", ADD_STYLE),
    ("GM.addStyle", ADD_STYLE),
    ("GM_setValue", SET_VALUE),
    ("GM.setValue", SET_VALUE),
    ("GM_getValue", GET_VALUE),
    ("GM.getValue", GET_VALUE),
    ("GM_deleteValue", DELETE_VALUE),
    ("GM.deleteValue", DELETE_VALUE),
    ("GM_listValues", LIST_VALUES),
    ("GM.listValues", LIST_VALUES),
    ("GM_xmlhttpRequest", XML_HTTP_REQUEST),
    ("GM_xmlHttpRequest", XML_HTTP_REQUEST),
    ("GM.xmlHttpRequest", XML_HTTP_REQUEST),
    ("GM_notification", NOTIFICATION),
    ("GM.notification", NOTIFICATION),
    ("GM_setClipboard", SET_CLIPBOARD),
    ("GM.setClipboard", SET_CLIPBOARD),
    ("GM_openInTab", OPEN_IN_TAB),
    ("GM.openInTab", OPEN_IN_TAB),
    ("GM_download", DOWNLOAD),
    ("GM.download", DOWNLOAD),
];

/// Rendered shim for one API, `None` when the API has no entry
pub fn shim_for(api: &str) -> Option<String> {
    GM_API_SHIMS
        .iter()
        .find(|(name, _)| *name == api)
        .map(|(name, body)| render_shim(name, body))
}

fn render_shim(api: &str, body: &str) -> String {
    match api.strip_prefix("GM.") {
        Some(member) => format!(
            "    // {api} polyfill\n    if (typeof GM === 'undefined' || !GM.{member}) {{\n        window.GM = window.GM || {{}};\n        GM.{member} = {body};\n    }}"
        ),
        None => format!(
            "    // {api} polyfill\n    if (typeof {api} === 'undefined') {{\n        window.{api} = {body};\n    }}"
        ),
    }
}

pub struct PolyfillInjector<'a> {
    metadata: &'a UserScriptMetadata,
}

impl<'a> PolyfillInjector<'a> {
    pub fn new(metadata: &'a UserScriptMetadata) -> Self {
        Self { metadata }
    }

    /// Prepend the polyfill for the granted GM APIs to `code_body`.
    /// Without GM grants the body is returned untouched.
    pub fn inject(&self, code_body: &str, reporter: &dyn Reporter) -> String {
        match self.generate_polyfill(reporter) {
            Some(polyfill) => format!("{}\n\n{}", polyfill, code_body),
            None => code_body.to_string(),
        }
    }

    pub fn generate_polyfill(&self, reporter: &dyn Reporter) -> Option<String> {
        if !self.metadata.uses_gm_api() {
            return None;
        }

        let mut parts = vec![
            POLYFILL_HEADER.to_string(),
            WRAPPER_OPEN.to_string(),
            WRAPPER_STRICT.to_string(),
            String::new(),
        ];

        for api in self.metadata.required_apis() {
            match shim_for(api) {
                Some(shim) => parts.push(shim),
                None => reporter.debug(&format!("No polyfill available for {}, skipping", api)),
            }
        }

        parts.push(WRAPPER_CLOSE.to_string());
        Some(parts.join("\n"))
    }
}
