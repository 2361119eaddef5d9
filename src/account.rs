use crate::error::Result;

/// Lookups and mutations on the advertising account.
///
/// Lookups return `Ok(None)` when nothing matches; `Err` is reserved for
/// failures of the account API itself.
pub trait AdAccount {
    type AdGroup;
    type NegativeList;

    fn find_ad_group(&mut self, name: &str, campaign_name: &str) -> Result<Option<Self::AdGroup>>;

    fn find_negative_list(&mut self, name: &str) -> Result<Option<Self::NegativeList>>;

    fn create_negative_keyword(&mut self, ad_group: &Self::AdGroup, keyword: &str) -> Result<()>;

    fn add_negative_keywords(&mut self, list: &Self::NegativeList, keywords: &[String]) -> Result<()>;
}

impl<T: AdAccount + ?Sized> AdAccount for &mut T {
    type AdGroup = T::AdGroup;
    type NegativeList = T::NegativeList;

    fn find_ad_group(&mut self, name: &str, campaign_name: &str) -> Result<Option<Self::AdGroup>> {
        (**self).find_ad_group(name, campaign_name)
    }

    fn find_negative_list(&mut self, name: &str) -> Result<Option<Self::NegativeList>> {
        (**self).find_negative_list(name)
    }

    fn create_negative_keyword(&mut self, ad_group: &Self::AdGroup, keyword: &str) -> Result<()> {
        (**self).create_negative_keyword(ad_group, keyword)
    }

    fn add_negative_keywords(&mut self, list: &Self::NegativeList, keywords: &[String]) -> Result<()> {
        (**self).add_negative_keywords(list, keywords)
    }
}
