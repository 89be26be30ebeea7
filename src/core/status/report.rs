use crate::domain::error::{PbiLinkError, PbiLinkResult};
use serde::{Deserialize, Serialize};

/// One running Power BI Desktop instance bound to a `.pbix` file,
/// as reported by the external tool's status query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Absolute path of the open `.pbix` file
    #[serde(rename = "PbixPath")]
    pub pbix_path: String,
    /// OS process id of the hosting instance
    #[serde(rename = "ProcessId")]
    pub process_id: u32,
}

/// Parsed result of a status query. Produced fresh on every query,
/// never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusReport {
    /// Currently tracked sessions, in report order (may be empty)
    #[serde(rename = "pbiSessions", default)]
    pub sessions: Vec<Session>,
}

/// Parse the captured status output into a [`StatusReport`].
///
/// The tool prepends banner text before the JSON document, so parsing
/// starts at the first `{` and runs to end-of-output. An output with no
/// `{` at all is a parse error, not an empty report: callers must be able
/// to tell "no sessions" apart from "could not read the status".
pub fn parse_status_output(output: &str) -> PbiLinkResult<StatusReport> {
    let start = output.find('{').ok_or_else(|| PbiLinkError::Parse {
        message: "no JSON object found in status output".to_string(),
    })?;

    serde_json::from_str(&output[start..]).map_err(|e| PbiLinkError::Parse {
        message: format!("invalid status JSON: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_banner_text() {
        let output = concat!(
            "pbi-tools 1.0.0 - https://pbi.tools/\n",
            "Build: release\n",
            r#"{"pbiSessions":[{"PbixPath":"C:\\Data\\Report.pbix","ProcessId":4821}]}"#,
        );
        let report = parse_status_output(output).unwrap();
        assert_eq!(report.sessions.len(), 1);
        assert_eq!(report.sessions[0].pbix_path, "C:\\Data\\Report.pbix");
        assert_eq!(report.sessions[0].process_id, 4821);
    }

    #[test]
    fn test_parse_without_banner() {
        let report =
            parse_status_output(r#"{"pbiSessions":[{"PbixPath":"/tmp/a.pbix","ProcessId":7}]}"#)
                .unwrap();
        assert_eq!(report.sessions[0].process_id, 7);
    }

    #[test]
    fn test_no_brace_is_parse_error_not_empty_report() {
        let err = parse_status_output("pbi-tools 1.0.0\nno sessions here\n").unwrap_err();
        assert!(matches!(err, PbiLinkError::Parse { .. }));
    }

    #[test]
    fn test_empty_output_is_parse_error() {
        let err = parse_status_output("").unwrap_err();
        assert!(matches!(err, PbiLinkError::Parse { .. }));
    }

    #[test]
    fn test_invalid_json_after_brace_is_parse_error() {
        let err = parse_status_output("banner\n{not valid json").unwrap_err();
        assert!(matches!(err, PbiLinkError::Parse { .. }));
    }

    #[test]
    fn test_missing_sessions_field_means_no_sessions() {
        let report = parse_status_output(r#"{"version":"1.0.0"}"#).unwrap();
        assert!(report.sessions.is_empty());
    }

    #[test]
    fn test_empty_session_array() {
        let report = parse_status_output(r#"{"pbiSessions":[]}"#).unwrap();
        assert!(report.sessions.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let output = r#"{"pbiSessions":[{"PbixPath":"/d/r.pbix","ProcessId":1,"SessionId":"x"}],"amoVersion":"19.0"}"#;
        let report = parse_status_output(output).unwrap();
        assert_eq!(
            report.sessions,
            vec![Session {
                pbix_path: "/d/r.pbix".to_string(),
                process_id: 1,
            }]
        );
    }

    #[test]
    fn test_report_order_is_preserved() {
        let output = r#"{"pbiSessions":[
            {"PbixPath":"/d/first.pbix","ProcessId":10},
            {"PbixPath":"/d/second.pbix","ProcessId":20}
        ]}"#;
        let report = parse_status_output(output).unwrap();
        let pids: Vec<u32> = report.sessions.iter().map(|s| s.process_id).collect();
        assert_eq!(pids, vec![10, 20]);
    }
}
