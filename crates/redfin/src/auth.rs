//! Authentication mechanisms and the once-only auth lifecycle
//!
//! A [`AuthContext`] owns one [`AuthMechanism`]. It is bound to the
//! service's connector exactly once, authenticates while the service root
//! is being constructed, and is torn down exactly once when the service is
//! closed or dropped.

use redfin_core::{Connector, Credentials, Error, FieldKind, FieldSpec, Resource, Result};
use serde_json::json;
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Where the root document links to the sessions collection
const SESSIONS_LINK: FieldSpec =
    FieldSpec::new("sessions_path", &["Links", "Sessions", "@odata.id"], FieldKind::String).required();

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// A way of attaching credentials to the management connector
pub trait AuthMechanism {
    /// Establish credentials against the service whose root is `root`
    fn authenticate(&mut self, conn: &Rc<dyn Connector>, root: &Resource) -> Result<()>;

    /// Release whatever `authenticate` established
    fn close(&mut self, conn: &Rc<dyn Connector>) -> Result<()>;

    fn name(&self) -> &'static str;
}

fn require_username(mechanism: &str, username: &str) -> Result<()> {
    if username.is_empty() {
        return Err(Error::Configuration(format!(
            "{mechanism} authentication requires a username"
        )));
    }
    Ok(())
}

/// The sessions collection path linked from the root document
pub fn sessions_path(root: &Resource) -> Result<String> {
    SESSIONS_LINK
        .resolve(root.json(), root.path())?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::missing_attribute(SESSIONS_LINK.attribute(), root.path()))
}

/// HTTP basic authentication on every request
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl AuthMechanism for BasicAuth {
    fn authenticate(&mut self, conn: &Rc<dyn Connector>, _root: &Resource) -> Result<()> {
        require_username(self.name(), &self.username)?;
        debug!(username = %self.username, "Using basic authentication");
        conn.set_credentials(Some(Credentials::Basic {
            username: self.username.clone(),
            password: self.password.clone(),
        }));
        Ok(())
    }

    fn close(&mut self, conn: &Rc<dyn Connector>) -> Result<()> {
        conn.set_credentials(None);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "basic"
    }
}

/// An established session
#[derive(Debug, Clone)]
struct SessionHandle {
    location: Option<String>,
}

/// Session token authentication through the sessions collection
pub struct SessionAuth {
    username: String,
    password: String,
    session: Option<SessionHandle>,
}

impl SessionAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            session: None,
        }
    }

    /// Path of the established session, used to end it
    pub fn session_location(&self) -> Option<&str> {
        self.session.as_ref()?.location.as_deref()
    }
}

impl AuthMechanism for SessionAuth {
    fn authenticate(&mut self, conn: &Rc<dyn Connector>, root: &Resource) -> Result<()> {
        require_username(self.name(), &self.username)?;
        let sessions = sessions_path(root)?;

        debug!(path = %sessions, username = %self.username, "Creating session");
        let response = conn.post(
            &sessions,
            &json!({"UserName": self.username, "Password": self.password}),
        )?;

        let token = response
            .header(AUTH_TOKEN_HEADER)
            .ok_or_else(|| Error::missing_attribute(AUTH_TOKEN_HEADER, &sessions))?
            .to_string();
        let location = response.header("Location").map(str::to_string).or_else(|| {
            response
                .body
                .as_ref()
                .and_then(|body| body.get("@odata.id"))
                .and_then(|id| id.as_str())
                .map(str::to_string)
        });
        if location.is_none() {
            warn!(path = %sessions, "Session created without a location, it cannot be deleted on close");
        }

        conn.set_credentials(Some(Credentials::SessionToken(token)));
        info!(location = ?location, "Session established");
        self.session = Some(SessionHandle { location });
        Ok(())
    }

    fn close(&mut self, conn: &Rc<dyn Connector>) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let result = match &session.location {
            Some(location) => {
                debug!(location = %location, "Deleting session");
                conn.delete(location).map_err(Error::from)
            }
            None => Ok(()),
        };
        conn.set_credentials(None);
        result
    }

    fn name(&self) -> &'static str {
        "session"
    }
}

enum ActiveAuth {
    Anonymous,
    Session(SessionAuth),
    Basic(BasicAuth),
}

/// Session authentication, falling back to basic when it fails.
///
/// Without a username nothing is attached and the service is accessed
/// anonymously.
pub struct SessionOrBasicAuth {
    username: Option<String>,
    password: Option<String>,
    active: Option<ActiveAuth>,
}

impl SessionOrBasicAuth {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username,
            password,
            active: None,
        }
    }

    /// Which mechanism ended up in use, once authenticated
    pub fn active_mechanism(&self) -> Option<&'static str> {
        match self.active.as_ref()? {
            ActiveAuth::Anonymous => Some("anonymous"),
            ActiveAuth::Session(session) => Some(session.name()),
            ActiveAuth::Basic(basic) => Some(basic.name()),
        }
    }
}

impl AuthMechanism for SessionOrBasicAuth {
    fn authenticate(&mut self, conn: &Rc<dyn Connector>, root: &Resource) -> Result<()> {
        let Some(username) = self.username.clone() else {
            debug!("No username configured, accessing the service anonymously");
            self.active = Some(ActiveAuth::Anonymous);
            return Ok(());
        };
        let password = self.password.clone().unwrap_or_default();

        let mut session = SessionAuth::new(username.clone(), password.clone());
        match session.authenticate(conn, root) {
            Ok(()) => {
                self.active = Some(ActiveAuth::Session(session));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Session authentication failed, falling back to basic");
                let mut basic = BasicAuth::new(username, password);
                basic.authenticate(conn, root)?;
                self.active = Some(ActiveAuth::Basic(basic));
                Ok(())
            }
        }
    }

    fn close(&mut self, conn: &Rc<dyn Connector>) -> Result<()> {
        match self.active.take() {
            Some(ActiveAuth::Session(mut session)) => session.close(conn),
            Some(ActiveAuth::Basic(mut basic)) => basic.close(conn),
            Some(ActiveAuth::Anonymous) | None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "session-or-basic"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
    Closed,
}

/// Owns the chosen mechanism and drives it through its lifecycle
pub struct AuthContext {
    mechanism: Option<Box<dyn AuthMechanism>>,
    conn: Option<Rc<dyn Connector>>,
    state: AuthState,
}

impl std::fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthContext")
            .field("mechanism", &self.mechanism.as_ref().map(|m| m.name()))
            .field("bound", &self.conn.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl AuthContext {
    /// Pick the mechanism.
    ///
    /// An explicit mechanism carries its own credentials, so combining one
    /// with a username or password is rejected. Without one, session
    /// authentication with basic fallback is used.
    pub fn new(
        auth: Option<Box<dyn AuthMechanism>>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self> {
        let mechanism = match auth {
            Some(mechanism) => {
                if username.is_some() || password.is_some() {
                    return Err(Error::Configuration(
                        "Username or Password were provided along with an explicit auth mechanism"
                            .to_string(),
                    ));
                }
                mechanism
            }
            None => Box::new(SessionOrBasicAuth::new(username, password)),
        };
        Ok(Self {
            mechanism: Some(mechanism),
            conn: None,
            state: AuthState::Unauthenticated,
        })
    }

    /// Attach the connector credentials will be set on; allowed once
    pub fn bind(&mut self, conn: Rc<dyn Connector>) -> Result<()> {
        if self.conn.is_some() {
            return Err(Error::Configuration(
                "Auth context is already bound to a connector".to_string(),
            ));
        }
        self.conn = Some(conn);
        Ok(())
    }

    pub fn authenticate(&mut self, root: &Resource) -> Result<()> {
        let conn = self.conn.as_ref().ok_or_else(|| {
            Error::Configuration("Auth context must be bound before authenticating".to_string())
        })?;
        let mechanism = self
            .mechanism
            .as_mut()
            .ok_or_else(|| Error::Configuration("Auth context is closed".to_string()))?;

        mechanism.authenticate(conn, root)?;
        self.state = AuthState::Authenticated;
        Ok(())
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Tear down the mechanism and release the connector.
    ///
    /// Errors are logged, never returned. Only the first call has any
    /// effect.
    pub fn close(&mut self) {
        if self.state == AuthState::Closed {
            return;
        }
        self.state = AuthState::Closed;

        let mechanism = self.mechanism.take();
        let Some(conn) = self.conn.take() else {
            return;
        };
        if let Some(mut mechanism) = mechanism {
            if let Err(e) = mechanism.close(&conn) {
                warn!(error = %e, mechanism = mechanism.name(), "Ignoring error while closing Redfish session");
            }
        }
        conn.close();
    }
}
