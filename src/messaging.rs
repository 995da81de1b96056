//! JSON messages exchanged with the host process, one object per line.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("malformed host message: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FocusTarget {
    Editor,
    Viewer,
    Dropdown,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    Results {
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    },
    #[serde(rename_all = "camelCase")]
    SetText {
        text: String,
        #[serde(default)]
        selection: Option<(usize, usize)>,
    },
    #[serde(rename_all = "camelCase")]
    OpenCell {
        row: usize,
        column: usize,
        container_id: String,
    },
    #[serde(rename_all = "camelCase")]
    OpenObject {
        value: Value,
        container_id: String,
    },
    Search {
        query: String,
        #[serde(default)]
        mode: Option<String>,
    },
    Navigate {
        delta: isize,
    },
    SelectMatchAt {
        offset: usize,
    },
    CopyValue,
    CloseViewer,
    #[serde(rename_all = "camelCase")]
    OpenColumnStats {
        column: usize,
        container_id: String,
    },
    CloseColumnStats,
    Focus {
        target: FocusTarget,
    },
    /// Declares elements present in the webview.
    Mount {
        ids: Vec<String>,
    },
    Key {
        trigger: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PanelMessage {
    ExecuteQuery { text: String },
    CancelQuery,
    SaveDocument { text: String },
    DocumentChanged { text: String },
    WriteClipboard { text: String },
    SearchModeChanged { mode: String },
    Render { target: String, html: String },
    #[serde(rename_all = "camelCase")]
    ScrollToMatch {
        target: String,
        match_index: usize,
        smooth: bool,
    },
    FocusElement { target: String },
    Warning { message: String },
}

pub fn parse_host_message(line: &str) -> Result<HostMessage, MessageError> {
    Ok(serde_json::from_str(line)?)
}

pub fn encode_panel_message(message: &PanelMessage) -> Result<String, MessageError> {
    Ok(serde_json::to_string(message)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_tagged_host_messages() {
        let message =
            parse_host_message(r#"{"type":"openCell","row":3,"column":1,"containerId":"cell"}"#)
                .unwrap();
        assert_eq!(
            message,
            HostMessage::OpenCell {
                row: 3,
                column: 1,
                container_id: "cell".to_string()
            }
        );

        let search = parse_host_message(r#"{"type":"search","query":"a*"}"#).unwrap();
        assert_eq!(
            search,
            HostMessage::Search {
                query: "a*".to_string(),
                mode: None
            }
        );

        let mount = parse_host_message(r#"{"type":"mount","ids":["cell","stats"]}"#).unwrap();
        assert_eq!(
            mount,
            HostMessage::Mount {
                ids: vec!["cell".to_string(), "stats".to_string()]
            }
        );

        let focus = parse_host_message(r#"{"type":"focus","target":"viewer"}"#).unwrap();
        assert_eq!(
            focus,
            HostMessage::Focus {
                target: FocusTarget::Viewer
            }
        );
    }

    #[test]
    fn results_carry_raw_json_cells() {
        let message = parse_host_message(
            r#"{"type":"results","columns":["id","doc"],"rows":[[1,{"k":null}]]}"#,
        )
        .unwrap();
        let HostMessage::Results { columns, rows } = message else {
            panic!("expected results");
        };
        assert_eq!(columns, vec!["id", "doc"]);
        assert_eq!(rows[0][1], json!({"k": null}));
    }

    #[test]
    fn rejects_unknown_or_malformed_messages() {
        assert!(parse_host_message(r#"{"type":"explode"}"#).is_err());
        assert!(parse_host_message("not json").is_err());
        let error = parse_host_message(r#"{"type":"navigate"}"#).unwrap_err();
        assert!(error.to_string().starts_with("malformed host message"));
    }

    #[test]
    fn encodes_panel_messages_with_type_tag() {
        let encoded = encode_panel_message(&PanelMessage::ExecuteQuery {
            text: "select 1".to_string(),
        })
        .unwrap();
        assert_eq!(encoded, r#"{"type":"executeQuery","text":"select 1"}"#);

        let unit = encode_panel_message(&PanelMessage::CancelQuery).unwrap();
        assert_eq!(unit, r#"{"type":"cancelQuery"}"#);

        let scroll = encode_panel_message(&PanelMessage::ScrollToMatch {
            target: "cell-content".to_string(),
            match_index: 2,
            smooth: true,
        })
        .unwrap();
        assert_eq!(
            scroll,
            r#"{"type":"scrollToMatch","target":"cell-content","matchIndex":2,"smooth":true}"#
        );
    }
}
