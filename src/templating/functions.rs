//! Template functions for boot-configuration fragments.
//!
//! Functions are registered on each fresh Tera instance with camelCase names and take
//! named arguments:
//!
//! ```text
//! {{ skip(key="node_ip") }}                    -> {{.node_ip}}
//! {{ cloudProvider() }}                        -> aws | gce | external | ...
//! {{ cloudConfigFlag() }}                      -> --cloud-config=/etc/kubernetes/cloud.conf
//! {{ onPremPlatformShortName() }}              -> kni | openstack | ...
//! {{ onPremPlatformAPIServerInternalIP() }}    -> first API VIP
//! {{ onPremPlatformAPIServerInternalIPs() }}   -> all API VIPs
//! {{ onPremPlatformIngressIP() }}              -> first ingress VIP
//! {{ onPremPlatformIngressIPs() }}             -> all ingress VIPs
//! {{ isOpenShiftManagedDefaultLB() }}          -> true | false
//! {{ urlHost(u=infra.status.apiServerInternalURI) }}
//! {{ urlPort(u=infra.status.apiServerInternalURI) }}
//! ```
//!
//! Tera's built-in filters and functions remain available alongside these.

use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tera::{Tera, Value};
use url::Url;

use super::context::RenderContext;
use crate::core::RenderError;
use crate::platform;

const SKIP_KEY_PATTERN: &str = r"^[_a-z][A-Za-z0-9_]*$";

/// Register every function on `tera`, each capturing its own handle to `ctx`
pub fn register_functions(tera: &mut Tera, ctx: &Arc<RenderContext>) {
    tera.register_function("skip", skip_function);
    tera.register_function("urlHost", url_host_function);
    tera.register_function("urlPort", url_port_function);

    let c = Arc::clone(ctx);
    tera.register_function("cloudProvider", move |_: &HashMap<String, Value>| {
        Ok(Value::String(platform::cloud_provider(c.infra(), c.gates())))
    });

    let c = Arc::clone(ctx);
    tera.register_function("cloudConfigFlag", move |_: &HashMap<String, Value>| {
        Ok(Value::String(platform::cloud_config_flag(
            &c.spec.cloud_provider_config,
            c.infra(),
            c.gates(),
        )))
    });

    let c = Arc::clone(ctx);
    tera.register_function("onPremPlatformShortName", move |_: &HashMap<String, Value>| {
        Ok(Value::String(platform::on_prem_short_name(c.infra()).to_string()))
    });

    let c = Arc::clone(ctx);
    tera.register_function("onPremPlatformAPIServerInternalIP", move |_: &HashMap<String, Value>| {
        optional(platform::on_prem_api_server_internal_ip(c.infra()))
    });

    let c = Arc::clone(ctx);
    tera.register_function(
        "onPremPlatformAPIServerInternalIPs",
        move |_: &HashMap<String, Value>| list(platform::on_prem_api_server_internal_ips(c.infra())),
    );

    let c = Arc::clone(ctx);
    tera.register_function("onPremPlatformIngressIP", move |_: &HashMap<String, Value>| {
        optional(platform::on_prem_ingress_ip(c.infra()))
    });

    let c = Arc::clone(ctx);
    tera.register_function("onPremPlatformIngressIPs", move |_: &HashMap<String, Value>| {
        list(platform::on_prem_ingress_ips(c.infra()))
    });

    let c = Arc::clone(ctx);
    tera.register_function("isOpenShiftManagedDefaultLB", move |_: &HashMap<String, Value>| {
        Ok(Value::Bool(platform::is_managed_default_lb(c.infra())))
    });
}

fn to_tera(err: RenderError) -> tera::Error {
    tera::Error::msg(err.to_string())
}

/// `None` renders as an empty string
fn optional(result: Result<Option<String>, RenderError>) -> tera::Result<Value> {
    Ok(result.map_err(to_tera)?.map_or(Value::Null, Value::String))
}

fn list(result: Result<Vec<String>, RenderError>) -> tera::Result<Value> {
    Ok(Value::Array(result.map_err(to_tera)?.into_iter().map(Value::String).collect()))
}

fn string_arg<'a>(args: &'a HashMap<String, Value>, function: &str, name: &str) -> tera::Result<&'a str> {
    args.get(name).and_then(Value::as_str).ok_or_else(|| {
        tera::Error::msg(format!("{function} requires a string argument `{name}`"))
    })
}

fn skip_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let key = string_arg(args, "skip", "key")?;
    skip(key).map(Value::String).map_err(to_tera)
}

fn url_host_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let u = string_arg(args, "urlHost", "u")?;
    url_host(u).map(Value::String).map_err(to_tera)
}

fn url_port_function(args: &HashMap<String, Value>) -> tera::Result<Value> {
    let u = string_arg(args, "urlPort", "u")?;
    url_port(u).map(Value::String).map_err(to_tera)
}

/// Placeholder left for substitution when the fragment is served to a node
pub fn skip(key: &str) -> Result<String, RenderError> {
    let re = Regex::new(SKIP_KEY_PATTERN).map_err(|e| RenderError::Other {
        message: e.to_string(),
    })?;
    if !re.is_match(key) {
        return Err(RenderError::InvalidSkipKey {
            key: key.to_string(),
        });
    }
    Ok(format!("{{{{.{key}}}}}"))
}

/// Host part of a URL, IPv6 addresses without brackets; relative references yield `""`
pub fn url_host(u: &str) -> Result<String, RenderError> {
    match Url::parse(u) {
        Ok(url) => Ok(match url.host() {
            Some(url::Host::Ipv6(addr)) => addr.to_string(),
            Some(host) => host.to_string(),
            None => String::new(),
        }),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(String::new()),
        Err(e) => Err(RenderError::InvalidUrl {
            url: u.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Port of a URL: the explicit port if given, otherwise 80/443 for http/https
pub fn url_port(u: &str) -> Result<String, RenderError> {
    let url = Url::parse(u).map_err(|e| RenderError::InvalidUrl {
        url: u.to_string(),
        reason: e.to_string(),
    })?;

    if let Some(port) = url.port() {
        return Ok(port.to_string());
    }

    // The parser drops ports that equal the scheme default; an explicit one still counts
    if let Some(default) = url.port_or_known_default()
        && has_explicit_port(u, default)
    {
        return Ok(default.to_string());
    }

    match url.scheme() {
        "http" => Ok("80".to_string()),
        "https" => Ok("443".to_string()),
        _ => Err(RenderError::UnknownUrlScheme {
            url: u.to_string(),
        }),
    }
}

fn has_explicit_port(raw: &str, port: u16) -> bool {
    let Some((_, rest)) = raw.split_once("://") else {
        return false;
    };
    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit_once('@').map_or(authority, |(_, hp)| hp);
    // Skip over a bracketed IPv6 literal before looking for the port separator
    let after_host = match host_port.rfind(']') {
        Some(end) => &host_port[end + 1..],
        None => host_port,
    };
    after_host.rsplit_once(':').is_some_and(|(_, p)| p.parse::<u16>() == Ok(port))
}
