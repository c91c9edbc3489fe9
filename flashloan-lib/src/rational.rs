use flashloan_interface::Rational;

pub trait RationalQty {
    fn is_valid(&self) -> bool;

    fn is_lte_one(&self) -> bool;

    fn floor_mul(&self, value: u128) -> Option<u128>;

    fn ceil_mul(&self, value: u128) -> Option<u128>;
}

impl<T: RationalQty + ?Sized> RationalQty for &T {
    fn is_valid(&self) -> bool {
        (*self).is_valid()
    }

    fn is_lte_one(&self) -> bool {
        (*self).is_lte_one()
    }

    fn floor_mul(&self, value: u128) -> Option<u128> {
        (*self).floor_mul(value)
    }

    fn ceil_mul(&self, value: u128) -> Option<u128> {
        (*self).ceil_mul(value)
    }
}

impl RationalQty for Rational {
    fn is_valid(&self) -> bool {
        self.denom != 0
    }

    fn is_lte_one(&self) -> bool {
        self.num <= self.denom
    }

    // value = q * denom + r, so value * num / denom = q * num + r * num / denom.
    // r < denom <= u64::MAX, hence r * num always fits in a u128.

    fn floor_mul(&self, value: u128) -> Option<u128> {
        let (num, denom) = (u128::from(self.num), u128::from(self.denom));
        let q = value.checked_div(denom)?;
        let r = value.checked_rem(denom)?;
        q.checked_mul(num)?.checked_add(r * num / denom)
    }

    fn ceil_mul(&self, value: u128) -> Option<u128> {
        let (num, denom) = (u128::from(self.num), u128::from(self.denom));
        let q = value.checked_div(denom)?;
        let r = value.checked_rem(denom)?;
        let partial = r * num;
        let rounded_up = partial / denom + u128::from(partial % denom != 0);
        q.checked_mul(num)?.checked_add(rounded_up)
    }
}
