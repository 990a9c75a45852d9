use std::future::Future;

use catalog::{
    Catalog, CatalogError, album::Albums, artist::Artists, resource::Collection, song::Songs,
};

/// Everything the views need from the outside world: the three collections and the session.
pub trait Backend: Clone + Send + Sync + 'static {
    type Artists: Collection<Artists> + 'static;
    type Albums: Collection<Albums> + 'static;
    type Songs: Collection<Songs> + 'static;

    fn artists(&self) -> Self::Artists;
    fn albums(&self) -> Self::Albums;
    fn songs(&self) -> Self::Songs;

    fn has_session(&self) -> bool;
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send;
    fn logout(&self) -> Result<(), CatalogError>;
}

impl Backend for Catalog {
    type Artists = catalog::resource::ResourceClient<Artists>;
    type Albums = catalog::resource::ResourceClient<Albums>;
    type Songs = catalog::resource::ResourceClient<Songs>;

    fn artists(&self) -> Self::Artists {
        Catalog::artists(self)
    }

    fn albums(&self) -> Self::Albums {
        Catalog::albums(self)
    }

    fn songs(&self) -> Self::Songs {
        Catalog::songs(self)
    }

    fn has_session(&self) -> bool {
        self.session().has_session()
    }

    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), CatalogError>> + Send {
        Catalog::login(self, username, password)
    }

    fn logout(&self) -> Result<(), CatalogError> {
        Catalog::logout(self)
    }
}
