//! The compact `name=hex,name=hex` register-list syntax shared by
//! `-p/--preset-regs` and `-e/--expect-regs`: `d,a,b,x,y,p=pc,s=sp,c=ccr`.

use hc11_core::registers::Registers;

#[derive(Debug, Clone, Copy)]
pub struct RegAssign {
    pub name: char,
    pub value: u16,
}

pub fn parse(spec: &str) -> Vec<RegAssign> {
    spec.split(',')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim().chars().next()?;
            let value = u16::from_str_radix(value.trim().trim_start_matches("0x"), 16).ok()?;
            Some(RegAssign { name, value })
        })
        .collect()
}

pub fn apply(regs: &mut Registers, assigns: &[RegAssign]) {
    for a in assigns {
        match a.name {
            'd' => regs.d = a.value,
            'a' => regs.set_a(a.value as u8),
            'b' => regs.set_b(a.value as u8),
            'x' => regs.x = a.value,
            'y' => regs.y = a.value,
            'p' => regs.pc = a.value,
            's' => regs.sp = a.value,
            'c' => regs.ccr = a.value as u8,
            other => eprintln!("warning: unknown register '{other}' in preset list"),
        }
    }
}

pub fn read(regs: &Registers, name: char) -> Option<u16> {
    Some(match name {
        'd' => regs.d,
        'a' => regs.a() as u16,
        'b' => regs.b() as u16,
        'x' => regs.x,
        'y' => regs.y,
        'p' => regs.pc,
        's' => regs.sp,
        'c' => regs.ccr as u16,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_then_read_round_trips() {
        let mut regs = Registers::new();
        let assigns = parse("x=aaaa,p=dddd,c=5a");
        apply(&mut regs, &assigns);
        assert_eq!(read(&regs, 'x'), Some(0xAAAA));
        assert_eq!(read(&regs, 'p'), Some(0xDDDD));
        assert_eq!(read(&regs, 'c'), Some(0x5A));
    }

    #[test]
    fn a_and_b_write_through_d() {
        let mut regs = Registers::new();
        apply(&mut regs, &parse("a=12,b=34"));
        assert_eq!(regs.d, 0x1234);
    }

    #[test]
    fn unknown_register_name_is_ignored_not_fatal() {
        let mut regs = Registers::new();
        apply(&mut regs, &parse("q=1"));
        assert_eq!(regs, Registers::new());
    }
}
