use std::sync::Arc;

use fsgate_app::EnvironmentInfra;
use fsgate_domain::Constants;

pub struct FsGateConstantsService<F>(Arc<F>);

impl<F> FsGateConstantsService<F> {
    pub fn new(infra: Arc<F>) -> Self {
        Self(infra)
    }
}

impl<F: EnvironmentInfra> FsGateConstantsService<F> {
    pub fn get_constants(&self) -> Constants {
        self.0.get_config().constants()
    }
}
