//! # contract: the boundary between ldsync and a LocDirect server
//!
//! [`StringServer`] is the single seam through which the pipelines talk to the outside
//! world. One implementor is bound to one server address; a synchronisation run uses two
//! of them (source and destination), which may point at the same server.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`; `MockStringServer` is exported under the default
//!   `test-export-mocks` feature so integration tests and downstream crates can use it.
//!
//! ## Errors
//! - `login` fails with [`Error::Authentication`] carrying the server's diagnostic.
//! - Every other call fails with [`Error::Remote`] when the server rejects the request,
//!   or when the transport gives up (timeouts included).
//!
//! [`Error::Authentication`]: crate::error::Error::Authentication
//! [`Error::Remote`]: crate::error::Error::Remote

#![allow(unused)]

use std::fmt;

use async_trait::async_trait;
use mockall::{automock, predicate::*};

use crate::error::Result;
use crate::table::FieldList;

/// Folder filter used for every export; LocDirect keeps all strings below `Strings/`.
pub const STRINGS_ROOT: &str = "Strings/";

/// Merge option 3 asks the server to update existing strings and mark changed
/// translations out of date.
pub const STRING_MERGE_OPTION: u8 = 3;

/// Opaque session identifier (`secId`) returned by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        SessionToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// User name and password, handed to [`StringServer::login`] untouched.
#[derive(Clone)]
pub struct Credentials {
    pub user: String,
    password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parameters of a `StringExport` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub project: String,
    pub fields: FieldList,
    pub folder_paths: String,
}

impl ExportRequest {
    pub fn new(project: impl Into<String>, fields: FieldList) -> Self {
        ExportRequest {
            project: project.into(),
            fields,
            folder_paths: STRINGS_ROOT.to_string(),
        }
    }
}

/// Parameters of a `StringImport` call. `payload` is an LDC blob whose rows match `fields`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub project: String,
    pub fields: FieldList,
    pub payload: String,
    /// Let the server create folders that do not exist yet in the destination project.
    pub create_folders: bool,
}

/// A language configured on a project, e.g. `enUS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLanguage {
    /// Language code followed by country code (`sv` + `SE` = `svSE`).
    pub code: String,
    pub is_source: bool,
}

impl ProjectLanguage {
    pub fn text_field(&self) -> String {
        format!("text_{}", self.code)
    }
}

/// Operations ldsync needs from one LocDirect server.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait StringServer: Send + Sync {
    /// Log in and obtain a session token for the remaining calls.
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken>;

    /// Export the requested fields of a project as an LDC blob. An empty blob means the
    /// project has no strings.
    async fn export_strings(&self, session: &SessionToken, request: ExportRequest)
        -> Result<String>;

    /// Import an LDC payload into a project.
    async fn import_strings(&self, session: &SessionToken, request: ImportRequest) -> Result<()>;

    /// List the project's languages in server order.
    async fn project_languages(
        &self,
        session: &SessionToken,
        project: &str,
    ) -> Result<Vec<ProjectLanguage>>;
}
