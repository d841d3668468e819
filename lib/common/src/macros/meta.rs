/// Duplicate an [item](https://doc.rust-lang.org/nightly/reference/items.html) `$imp` for each type
/// `$T`, making it available within `$imp` under the alias `$Alias`.
///
/// ```
/// trait Zero { const ZERO: Self; }
/// polydetail_common::item_with! {N: u8, u16, u32 => impl Zero for N { const ZERO: Self = 0; }}
/// assert_eq!(<u16 as Zero>::ZERO, 0);
/// ```
#[macro_export]
macro_rules! item_with {
    {$Alias:ident: $($T:ty),+ => $imp:item} => {
        $(
            const _: () = { // anonymous module
                type $Alias = $T;
                $imp
            };
        )+
    };
}
