//! ARC600 register table.
//!
//! When debugging with `arc-elf32-gdb`, the client must be given a
//! description of the target's auxiliary registers (by default GDB looks
//! for an `arc-registers.xml`, first in the working directory and then in
//! the user's home directory). The table below is the schema that document
//! is generated from; its row order is the wire contract.

use regstub::arch::{ArchDescriptor, Endianness, RegSpec};

/// ARC600 register set, in wire-protocol order.
///
/// The `unused_*` rows are reserved auxiliary-register slots. They carry
/// no architectural state, but existing debugger configurations hard-code
/// the offsets that follow them, so they keep their place in the table.
pub static ARC600_REGS: &[RegSpec] = &[
    RegSpec::int(32, "r0"),
    RegSpec::int(32, "r1"),
    RegSpec::int(32, "r2"),
    RegSpec::int(32, "r3"),
    RegSpec::int(32, "r4"),
    RegSpec::int(32, "r5"),
    RegSpec::int(32, "r6"),
    RegSpec::int(32, "r7"),
    RegSpec::int(32, "r8"),
    RegSpec::int(32, "r9"),
    RegSpec::int(32, "r10"),
    RegSpec::int(32, "r11"),
    RegSpec::int(32, "r12"),
    RegSpec::int(32, "r13"),
    RegSpec::int(32, "r14"),
    RegSpec::int(32, "r15"),
    RegSpec::int(32, "r16"),
    RegSpec::int(32, "r17"),
    RegSpec::int(32, "r18"),
    RegSpec::int(32, "r19"),
    RegSpec::int(32, "r20"),
    RegSpec::int(32, "r21"),
    RegSpec::int(32, "r22"),
    RegSpec::int(32, "r23"),
    RegSpec::int(32, "r24"),
    RegSpec::int(32, "r25"),
    RegSpec::int(32, "r26"),
    RegSpec::int(32, "fp"),
    RegSpec::int(32, "sp"),
    RegSpec::int(32, "ilink1"),
    RegSpec::int(32, "ilink2"),
    RegSpec::int(32, "blink"),
    RegSpec::int(32, "lp_count"),
    RegSpec::int(32, "pcl"),
    RegSpec::int_opt(32, "status"),
    RegSpec::int_opt(32, "semaphore"),
    RegSpec::int(32, "lp_start"),
    RegSpec::int(32, "lp_end"),
    RegSpec::int(32, "identity"),
    RegSpec::int(32, "debug"),
    RegSpec::int(32, "pc"),
    RegSpec::int(32, "sr32"),
    RegSpec::int(32, "sr32_l1"),
    RegSpec::int(32, "sr32_l2"),
    RegSpec::int_opt(32, "count0"),
    RegSpec::int_opt(32, "control0"),
    RegSpec::int_opt(32, "limit0"),
    RegSpec::int(32, "int_vector_base"),
    RegSpec::int(32, "aux_macmode"),
    RegSpec::int(32, "aux_irq_lv12"),
    RegSpec::int_opt(32, "count1"),
    RegSpec::int_opt(32, "control1"),
    RegSpec::int_opt(32, "limit1"),
    RegSpec::int(32, "aux_irq_lev"),
    RegSpec::int(32, "aux_irq_hint"),
    RegSpec::int_opt(32, "ic_ivic"),
    RegSpec::int_opt(32, "ic_ctrl"),
    RegSpec::int_opt(32, "dc_ivdc"),
    RegSpec::int_opt(32, "dc_ctrl"),
    RegSpec::int_opt(32, "amv0"),
    RegSpec::int_opt(32, "amm0"),
    RegSpec::int_opt(32, "ac0"),
    RegSpec::int(32, "bcr_ver"),
    RegSpec::int_opt(32, "dccm_base_build"),
    RegSpec::int_opt(32, "crc_base_build"),
    RegSpec::int_opt(32, "dvbf_build"),
    RegSpec::int(32, "ea_build"),
    RegSpec::int_opt(32, "unused_66"),
    RegSpec::int_opt(32, "memsubsys_build"),
    RegSpec::int(32, "vecbase_ac_build"),
    RegSpec::int_opt(32, "p_base_address"),
    RegSpec::int_opt(32, "unused_6a"),
    RegSpec::int_opt(32, "unused_6b"),
    RegSpec::int_opt(32, "unused_6c"),
    RegSpec::int_opt(32, "unused_6d"),
    RegSpec::int(32, "rf_build"),
    RegSpec::int_opt(32, "mmu_build"),
    RegSpec::int_opt(32, "arcangel_build"),
    RegSpec::int_opt(32, "unused_71"),
    RegSpec::int_opt(32, "dcache_build"),
    RegSpec::int_opt(32, "madi_build"),
    RegSpec::int_opt(32, "dccm_build"),
    RegSpec::int(32, "timer_build"),
    RegSpec::int_opt(32, "ap_build"),
    RegSpec::int_opt(32, "icache_build"),
    RegSpec::int_opt(32, "iccm_build"),
    RegSpec::int_opt(32, "dspram_build"),
    RegSpec::int_opt(32, "mac_build"),
    RegSpec::int(32, "multiply_build"),
    RegSpec::int(32, "swap_build"),
    RegSpec::int(32, "norm_build"),
    RegSpec::int(32, "minmax_build"),
    RegSpec::int(32, "barrel_build"),
];

/// The ARC600 architecture descriptor.
pub static ARC600: ArchDescriptor = ArchDescriptor {
    name: "arc600",
    arch_name: "arc600",
    endianness: Endianness::Little,
    setup_hint: Some("set architecture opella-target arc600"),
    regs: ARC600_REGS,
};
