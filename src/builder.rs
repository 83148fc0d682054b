use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::provider::Provider;
use crate::providers::{
    APPLICATION_JSON_VAR, CommandLine, CommandLineJson, ConfigTrees, Defaults, EnvironmentJson,
    EnvironmentVariables, JsonFile,
};
use crate::resolver::Resolver;
use crate::types::Location;

/// Builder for a [`Resolver`] with the standard provider chain.
///
/// Every process input the standard providers read (arguments, environment
/// variables, working/home/application directories) can be supplied
/// explicitly; whatever is not supplied is taken from the running process
/// when [`build()`](Self::build) is called.
pub struct ResolverBuilder {
    args: Option<Vec<String>>,
    env_vars: Option<Vec<(String, String)>>,
    working_dir: Option<PathBuf>,
    home_dir: Option<PathBuf>,
    app_root: Option<PathBuf>,
    standard_providers: bool,
    verbose: bool,
    defaults: Vec<(String, Value)>,
    providers: Vec<Box<dyn Provider>>,
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            args: None,
            env_vars: None,
            working_dir: None,
            home_dir: None,
            app_root: None,
            standard_providers: true,
            verbose: false,
            defaults: Vec::new(),
            providers: Vec::new(),
        }
    }

    /// Command-line arguments, program name included (default: the process's).
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Environment variables (default: the process's).
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Base directory for `application*.json` (default: the working directory).
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Directory holding the devtools file (default: the user's home).
    pub fn home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Directory holding the packaged `application.json` (default: see
    /// [`Location::AppRoot`]).
    pub fn app_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.app_root = Some(dir.into());
        self
    }

    /// Leave out the standard providers; only the defaults sink and providers
    /// added with [`provider()`](Self::provider) are registered.
    pub fn no_standard_providers(mut self) -> Self {
        self.standard_providers = false;
        self
    }

    /// Enable verbose logging (default: `false`).
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Seed a default, as [`Resolver::set_default`] would.
    pub fn default_value(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.defaults.push((key.to_string(), value.into()));
        self
    }

    /// Register an additional provider.
    pub fn provider<P: Provider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    fn effective_args(&self) -> Vec<String> {
        match &self.args {
            Some(args) => args.clone(),
            None => std::env::args_os()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        }
    }

    fn effective_env_vars(&self) -> HashMap<String, String> {
        match &self.env_vars {
            Some(vars) => vars.iter().cloned().collect(),
            None => std::env::vars_os()
                .map(|(k, v)| {
                    (
                        k.to_string_lossy().into_owned(),
                        v.to_string_lossy().into_owned(),
                    )
                })
                .collect(),
        }
    }

    fn location(explicit: &Option<PathBuf>, fallback: Location) -> Location {
        match explicit {
            Some(dir) => Location::Path(dir.clone()),
            None => fallback,
        }
    }

    /// The standard providers, highest priority first.
    fn standard_chain(&self) -> Vec<Box<dyn Provider>> {
        let args = self.effective_args();
        let vars = self.effective_env_vars();
        let cwd = Self::location(&self.working_dir, Location::Cwd);
        let home = Self::location(&self.home_dir, Location::Home);
        let app_root = Self::location(&self.app_root, Location::AppRoot);
        let inline_json = vars.get(APPLICATION_JSON_VAR).cloned();

        vec![
            Box::new(JsonFile::devtools(home)),
            Box::new(CommandLine::new(args.clone())),
            Box::new(CommandLineJson::new(args)),
            Box::new(EnvironmentJson::new(inline_json)),
            Box::new(EnvironmentVariables::new(vars)),
            Box::new(ConfigTrees),
            Box::new(JsonFile::profile_config(cwd.clone())),
            Box::new(JsonFile::profile(cwd.clone())),
            Box::new(JsonFile::application_config(cwd.clone())),
            Box::new(JsonFile::application(cwd)),
            Box::new(JsonFile::packaged(app_root)),
        ]
    }

    pub fn build(self) -> Resolver {
        let mut resolver = Resolver::empty(self.verbose);
        if self.standard_providers {
            for provider in self.standard_chain() {
                resolver.register_boxed(provider);
            }
        }
        resolver.register(Defaults);
        for provider in self.providers {
            resolver.register_boxed(provider);
        }
        for (key, value) in self.defaults {
            resolver.set_default(&key, value);
        }
        resolver
    }
}
