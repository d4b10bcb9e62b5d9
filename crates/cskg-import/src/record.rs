//! TSV record parsing.

use thiserror::Error;

/// One parsed data line of a CSKG dump.
///
/// Column layout: row id, node1, relation, node2, node1 label, node2 label,
/// relation label. Only the six fields below are consumed.
#[derive(Debug, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub node1_id: &'a str,
    pub node1_label: &'a str,
    pub node2_id: &'a str,
    pub node2_label: &'a str,
    pub relation: &'a str,
    pub relation_label: &'a str,
}

/// Why a line was rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected at least 7 tab-separated fields, got {0}")]
    TooFewFields(usize),

    #[error("empty node id field")]
    EmptyNodeId,
}

/// Parse one data line. Rejections are counted by the caller, never fatal.
pub fn parse_record(line: &str) -> Result<RawRecord<'_>, RecordError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 7 {
        return Err(RecordError::TooFewFields(fields.len()));
    }

    let record = RawRecord {
        node1_id: fields[1],
        node1_label: fields[4],
        node2_id: fields[3],
        node2_label: fields[5],
        relation: fields[2],
        relation_label: fields[6],
    };
    if record.node1_id.is_empty() || record.node2_id.is_empty() {
        return Err(RecordError::EmptyNodeId);
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let line = "row0\t/c/en/cat\t/r/IsA\t/c/en/animal\tcat\tanimal\tis a";
        let record = parse_record(line).unwrap();
        assert_eq!(record.node1_id, "/c/en/cat");
        assert_eq!(record.node1_label, "cat");
        assert_eq!(record.node2_id, "/c/en/animal");
        assert_eq!(record.node2_label, "animal");
        assert_eq!(record.relation, "/r/IsA");
        assert_eq!(record.relation_label, "is a");
    }

    #[test]
    fn test_parse_too_few_fields() {
        assert_eq!(
            parse_record("a\tb\tc"),
            Err(RecordError::TooFewFields(3))
        );
        assert_eq!(parse_record(""), Err(RecordError::TooFewFields(1)));
    }

    #[test]
    fn test_parse_empty_node_id() {
        let line = "row0\t\t/r/IsA\t/c/en/animal\tcat\tanimal\tis a";
        assert_eq!(parse_record(line), Err(RecordError::EmptyNodeId));

        let line = "row0\t/c/en/cat\t/r/IsA\t\tcat\tanimal\tis a";
        assert_eq!(parse_record(line), Err(RecordError::EmptyNodeId));
    }
}
