//! Part kind codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Semantic type of a part's payload, as carried in byte 0 of the header.
///
/// Any byte is a valid `PartKind`. Codes missing from the known table are
/// kept verbatim so they can be logged and re-encoded unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartKind(i8);

// Names for each code live in `KINDS`.
#[allow(missing_docs)]
impl PartKind {
    pub const NIL: Self = Self(0);
    pub const COMMAND: Self = Self(3);
    pub const RESULTSET: Self = Self(5);
    pub const ERROR: Self = Self(6);
    pub const STATEMENT_ID: Self = Self(10);
    pub const TRANSACTION_ID: Self = Self(11);
    pub const ROWS_AFFECTED: Self = Self(12);
    pub const RESULTSET_ID: Self = Self(13);
    pub const TOPOLOGY_INFORMATION: Self = Self(15);
    pub const TABLE_LOCATION: Self = Self(16);
    pub const READ_LOB_REQUEST: Self = Self(17);
    pub const READ_LOB_REPLY: Self = Self(18);
    pub const ABAP_ISTREAM: Self = Self(25);
    pub const ABAP_OSTREAM: Self = Self(26);
    pub const COMMAND_INFO: Self = Self(27);
    pub const WRITE_LOB_REQUEST: Self = Self(28);
    pub const CLIENT_CONTEXT: Self = Self(29);
    pub const WRITE_LOB_REPLY: Self = Self(30);
    pub const PARAMETERS: Self = Self(32);
    pub const AUTHENTICATION: Self = Self(33);
    pub const SESSION_CONTEXT: Self = Self(34);
    pub const CLIENT_ID: Self = Self(35);
    pub const PROFILE: Self = Self(38);
    pub const STATEMENT_CONTEXT: Self = Self(39);
    pub const PARTITION_INFORMATION: Self = Self(40);
    pub const OUTPUT_PARAMETERS: Self = Self(41);
    pub const CONNECT_OPTIONS: Self = Self(42);
    pub const COMMIT_OPTIONS: Self = Self(43);
    pub const FETCH_OPTIONS: Self = Self(44);
    pub const FETCH_SIZE: Self = Self(45);
    pub const PARAMETER_METADATA: Self = Self(47);
    pub const RESULT_METADATA: Self = Self(48);
    pub const FIND_LOB_REQUEST: Self = Self(49);
    pub const FIND_LOB_REPLY: Self = Self(50);
    pub const ITAB_SHM: Self = Self(51);
    pub const ITAB_CHUNK_METADATA: Self = Self(53);
    pub const ITAB_METADATA: Self = Self(55);
    pub const ITAB_RESULT_CHUNK: Self = Self(56);
    pub const CLIENT_INFO: Self = Self(57);
    pub const STREAM_DATA: Self = Self(58);
    pub const OSTREAM_RESULT: Self = Self(59);
    pub const FDA_REQUEST_METADATA: Self = Self(60);
    pub const FDA_REPLY_METADATA: Self = Self(61);
    pub const BATCH_PREPARE: Self = Self(62);
    pub const BATCH_EXECUTE: Self = Self(63);
    pub const TRANSACTION_FLAGS: Self = Self(64);
    pub const ROW_SLOT_IMAGE_PARAM_METADATA: Self = Self(65);
    pub const ROW_SLOT_IMAGE_RESULTSET: Self = Self(66);
    pub const DB_CONNECT_INFO: Self = Self(67);
    pub const LOB_FLAGS: Self = Self(68);
    pub const RESULTSET_OPTIONS: Self = Self(69);
    pub const XA_TRANSACTION_INFO: Self = Self(70);
    pub const SESSION_VARIABLE: Self = Self(71);
    pub const WORKLOAD_REPLAY_CONTEXT: Self = Self(72);
    pub const SQL_REPLY_OPTIONS: Self = Self(73);
}

impl PartKind {
    /// Wraps a raw code. Never fails.
    pub const fn new(code: i8) -> Self {
        Self(code)
    }

    /// The raw wire code.
    pub const fn code(self) -> i8 {
        self.0
    }

    /// Protocol name of this kind, or `None` for an unassigned code.
    pub fn name(self) -> Option<&'static str> {
        KINDS
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, name)| *name)
    }

    /// Whether the code appears in the known kind table.
    pub fn is_known(self) -> bool {
        self.name().is_some()
    }

    /// All known kinds with their names, in ascending code order.
    pub fn known() -> impl Iterator<Item = (Self, &'static str)> {
        KINDS.iter().copied()
    }
}

impl From<i8> for PartKind {
    fn from(code: i8) -> Self {
        Self(code)
    }
}

impl From<PartKind> for i8 {
    fn from(kind: PartKind) -> Self {
        kind.0
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "partKind({})", self.0),
        }
    }
}

/// Error returned when a string names no known part kind and is not a code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown part kind: {0:?}")]
pub struct ParsePartKindError(String);

impl FromStr for PartKind {
    type Err = ParsePartKindError;

    /// Accepts a known name (case-insensitive) or a decimal code in `i8` range.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Ok(code) = name.parse::<i8>() {
            return Ok(Self(code));
        }
        KINDS
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(name))
            .map(|(kind, _)| *kind)
            .ok_or_else(|| ParsePartKindError(name.to_owned()))
    }
}

/// Known codes and their protocol names.
const KINDS: &[(PartKind, &str)] = &[
    (PartKind::NIL, "nil"),
    (PartKind::COMMAND, "command"),
    (PartKind::RESULTSET, "resultset"),
    (PartKind::ERROR, "error"),
    (PartKind::STATEMENT_ID, "statementID"),
    (PartKind::TRANSACTION_ID, "transactionID"),
    (PartKind::ROWS_AFFECTED, "rowsAffected"),
    (PartKind::RESULTSET_ID, "resultsetID"),
    (PartKind::TOPOLOGY_INFORMATION, "topologyInformation"),
    (PartKind::TABLE_LOCATION, "tableLocation"),
    (PartKind::READ_LOB_REQUEST, "readLobRequest"),
    (PartKind::READ_LOB_REPLY, "readLobReply"),
    (PartKind::ABAP_ISTREAM, "abapIStream"),
    (PartKind::ABAP_OSTREAM, "abapOStream"),
    (PartKind::COMMAND_INFO, "commandInfo"),
    (PartKind::WRITE_LOB_REQUEST, "writeLobRequest"),
    (PartKind::CLIENT_CONTEXT, "clientContext"),
    (PartKind::WRITE_LOB_REPLY, "writeLobReply"),
    (PartKind::PARAMETERS, "parameters"),
    (PartKind::AUTHENTICATION, "authentication"),
    (PartKind::SESSION_CONTEXT, "sessionContext"),
    (PartKind::CLIENT_ID, "clientID"),
    (PartKind::PROFILE, "profile"),
    (PartKind::STATEMENT_CONTEXT, "statementContext"),
    (PartKind::PARTITION_INFORMATION, "partitionInformation"),
    (PartKind::OUTPUT_PARAMETERS, "outputParameters"),
    (PartKind::CONNECT_OPTIONS, "connectOptions"),
    (PartKind::COMMIT_OPTIONS, "commitOptions"),
    (PartKind::FETCH_OPTIONS, "fetchOptions"),
    (PartKind::FETCH_SIZE, "fetchSize"),
    (PartKind::PARAMETER_METADATA, "parameterMetadata"),
    (PartKind::RESULT_METADATA, "resultMetadata"),
    (PartKind::FIND_LOB_REQUEST, "findLobRequest"),
    (PartKind::FIND_LOB_REPLY, "findLobReply"),
    (PartKind::ITAB_SHM, "itabSHM"),
    (PartKind::ITAB_CHUNK_METADATA, "itabChunkMetadata"),
    (PartKind::ITAB_METADATA, "itabMetadata"),
    (PartKind::ITAB_RESULT_CHUNK, "itabResultChunk"),
    (PartKind::CLIENT_INFO, "clientInfo"),
    (PartKind::STREAM_DATA, "streamData"),
    (PartKind::OSTREAM_RESULT, "oStreamResult"),
    (PartKind::FDA_REQUEST_METADATA, "fdaRequestMetadata"),
    (PartKind::FDA_REPLY_METADATA, "fdaReplyMetadata"),
    (PartKind::BATCH_PREPARE, "batchPrepare"),
    (PartKind::BATCH_EXECUTE, "batchExecute"),
    (PartKind::TRANSACTION_FLAGS, "transactionFlags"),
    (PartKind::ROW_SLOT_IMAGE_PARAM_METADATA, "rowSlotImageParamMetadata"),
    (PartKind::ROW_SLOT_IMAGE_RESULTSET, "rowSlotImageResultset"),
    (PartKind::DB_CONNECT_INFO, "dbConnectInfo"),
    (PartKind::LOB_FLAGS, "lobFlags"),
    (PartKind::RESULTSET_OPTIONS, "resultsetOptions"),
    (PartKind::XA_TRANSACTION_INFO, "xaTransactionInfo"),
    (PartKind::SESSION_VARIABLE, "sessionVariable"),
    (PartKind::WORKLOAD_REPLAY_CONTEXT, "workLoadReplayContext"),
    (PartKind::SQL_REPLY_OPTIONS, "sqlReplyOptions"),
];
