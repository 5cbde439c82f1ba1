//! Unprivileged identity resolution.
//!
//! Accepts the spec forms understood by `gosu`: `name`, `uid`, `uid:gid`.

use std::ffi::{CStr, CString, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use thiserror::Error;

/// Largest buffer handed to `getpw*_r` before giving up on `ERANGE`.
const MAX_PASSWD_BUF: usize = 1 << 20;

/// Error type for identity resolution.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("unknown user {0:?}")]
    UnknownUser(String),

    #[error("invalid identity {0:?}, expected name, uid or uid:gid")]
    Invalid(String),

    #[error("user database lookup for {spec:?} failed: {source}")]
    Lookup { spec: String, source: io::Error },
}

/// A resolved user/group pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Login name, when the user database knows the uid.
    pub name: Option<String>,
    pub uid: u32,
    pub gid: u32,
    /// Home directory, when the user database knows the uid.
    pub home: Option<PathBuf>,
}

impl Identity {
    /// Resolve an identity spec.
    pub fn resolve(spec: &str) -> Result<Self, IdentityError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(IdentityError::Invalid(spec.to_string()));
        }

        if let Some((user, group)) = spec.split_once(':') {
            let uid = parse_id(user).ok_or_else(|| IdentityError::Invalid(spec.to_string()))?;
            let gid = parse_id(group).ok_or_else(|| IdentityError::Invalid(spec.to_string()))?;
            let entry = by_uid(uid).map_err(|source| IdentityError::Lookup {
                spec: spec.to_string(),
                source,
            })?;
            return Ok(Self {
                name: entry.as_ref().map(|e| e.name.clone()),
                uid,
                gid,
                home: entry.map(|e| e.home),
            });
        }

        if let Some(uid) = parse_id(spec) {
            let entry = by_uid(uid).map_err(|source| IdentityError::Lookup {
                spec: spec.to_string(),
                source,
            })?;
            return Ok(match entry {
                Some(e) => e.into_identity(),
                None => Self {
                    name: None,
                    uid,
                    gid: uid,
                    home: None,
                },
            });
        }

        match by_name(spec) {
            Ok(Some(entry)) => Ok(entry.into_identity()),
            Ok(None) => Err(IdentityError::UnknownUser(spec.to_string())),
            Err(source) => Err(IdentityError::Lookup {
                spec: spec.to_string(),
                source,
            }),
        }
    }

    /// Environment the server should see for this identity.
    pub fn env(&self) -> Vec<(String, String)> {
        let mut vars = Vec::new();
        if let Some(home) = &self.home {
            vars.push(("HOME".to_string(), home.display().to_string()));
        }
        if let Some(name) = &self.name {
            vars.push(("USER".to_string(), name.clone()));
        }
        vars
    }

    /// Whether the current process already runs with this uid.
    pub fn is_current(&self) -> bool {
        current_uid() == self.uid
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}({}:{})", name, self.uid, self.gid),
            None => write!(f, "{}:{}", self.uid, self.gid),
        }
    }
}

/// Effective uid of the running process.
pub fn current_uid() -> u32 {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() }
}

/// Effective gid of the running process.
pub fn current_gid() -> u32 {
    // SAFETY: getegid has no preconditions and cannot fail.
    unsafe { libc::getegid() }
}

fn parse_id(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

struct PasswdEntry {
    name: String,
    uid: u32,
    gid: u32,
    home: PathBuf,
}

impl PasswdEntry {
    fn into_identity(self) -> Identity {
        Identity {
            name: Some(self.name),
            uid: self.uid,
            gid: self.gid,
            home: Some(self.home),
        }
    }
}

fn by_name(name: &str) -> io::Result<Option<PasswdEntry>> {
    let cname = CString::new(name)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "user name contains NUL"))?;
    lookup(|pwd, buf, len, result| {
        // SAFETY: all pointers are valid for the duration of the call and
        // `len` is the length of `buf`.
        unsafe { libc::getpwnam_r(cname.as_ptr(), pwd, buf, len, result) }
    })
}

fn by_uid(uid: u32) -> io::Result<Option<PasswdEntry>> {
    lookup(|pwd, buf, len, result| {
        // SAFETY: see `by_name`.
        unsafe { libc::getpwuid_r(uid, pwd, buf, len, result) }
    })
}

fn lookup<F>(call: F) -> io::Result<Option<PasswdEntry>>
where
    F: Fn(*mut libc::passwd, *mut libc::c_char, libc::size_t, *mut *mut libc::passwd) -> libc::c_int,
{
    let mut buf_len = 1024;
    loop {
        let mut buf: Vec<libc::c_char> = vec![0; buf_len];
        // SAFETY: passwd is a plain C struct; all-zero is a valid bit pattern.
        let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
        let mut result: *mut libc::passwd = std::ptr::null_mut();

        let rc = call(
            &mut pwd as *mut libc::passwd,
            buf.as_mut_ptr(),
            buf.len(),
            &mut result as *mut *mut libc::passwd,
        );

        if rc == libc::ERANGE && buf_len < MAX_PASSWD_BUF {
            buf_len *= 2;
            continue;
        }
        if result.is_null() {
            // Several libcs report "not found" through errno-style codes.
            return match rc {
                0 | libc::ENOENT | libc::ESRCH | libc::EBADF | libc::EPERM => Ok(None),
                code => Err(io::Error::from_raw_os_error(code)),
            };
        }

        // SAFETY: on success pw_name and pw_dir point into `buf` as
        // NUL-terminated strings, and `buf` is still alive.
        let (name, home) = unsafe {
            (
                CStr::from_ptr(pwd.pw_name).to_string_lossy().into_owned(),
                PathBuf::from(OsStr::from_bytes(CStr::from_ptr(pwd.pw_dir).to_bytes())),
            )
        };
        return Ok(Some(PasswdEntry {
            name,
            uid: pwd.pw_uid,
            gid: pwd.pw_gid,
            home,
        }));
    }
}
